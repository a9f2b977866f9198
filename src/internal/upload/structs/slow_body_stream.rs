use std::io;
use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::{self, Stream};

/// 默认请求体长度（字节）
pub const DEFAULT_STREAM_LENGTH: u64 = 100_000;

/// 默认每次产出的字节数
pub const DEFAULT_SLOW_CHUNK_SIZE: usize = 1000;

/// 默认每次产出前的等待（毫秒）
pub const DEFAULT_SLOW_CHUNK_DELAY_MS: u64 = 10;

/// 慢速请求体：按固定节奏吐出固定总量的字节，让进度变化肉眼可见。
///
/// 默认配置下 100 000 字节分 100 块，每块间隔 10ms，约 1 秒发完。
#[derive(Debug, Clone)]
pub struct SlowBodyStream {
    total: u64,
    chunk_size: usize,
    delay: Duration,
}

impl Default for SlowBodyStream {
    fn default() -> Self {
        Self::new(DEFAULT_STREAM_LENGTH)
    }
}

impl SlowBodyStream {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            chunk_size: DEFAULT_SLOW_CHUNK_SIZE,
            delay: Duration::from_millis(DEFAULT_SLOW_CHUNK_DELAY_MS),
        }
    }

    /// 设置每块大小，最小为 1
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// 设置每块之间的等待，`Duration::ZERO` 表示不等待
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// 总字节数
    pub fn len(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// 转换为字节流；最后一块按剩余量截短。
    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes, io::Error>> + Send + 'static {
        let Self {
            total,
            chunk_size,
            delay,
        } = self;
        let block = Bytes::from(vec![0u8; chunk_size]);

        stream::unfold(0u64, move |produced| {
            let block = block.clone();
            async move {
                if produced >= total {
                    return None;
                }
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                let len = (total - produced).min(block.len() as u64) as usize;
                Some((Ok(block.slice(..len)), produced + len as u64))
            }
        })
    }
}
