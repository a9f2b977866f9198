//! 请求体计数：HTTP 客户端拉取请求体时累计字节数，并唤醒驱动任务。

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use bytes::Bytes;
use futures_util::future;
use futures_util::stream::{self, Stream, StreamExt};
use tokio::sync::Notify;

/// 只记数、只通知，不携带快照。
///
/// 高频拉取时多次通知会合并成一次唤醒，驱动任务每次读取的都是最新计数。
#[derive(Debug, Default)]
pub(super) struct SendCounter {
    /// 声明的请求体长度；HTTP 客户端写满该长度后不会再拉取流的结尾
    expected: Option<u64>,
    bytes: AtomicU64,
    finished: AtomicBool,
    notify: Notify,
}

impl SendCounter {
    pub(super) fn new(expected: Option<u64>) -> Self {
        Self {
            expected,
            ..Default::default()
        }
    }

    fn add(&self, len: usize) {
        self.bytes.fetch_add(len as u64, Ordering::AcqRel);
        self.notify.notify_one();
    }

    fn finish(&self) {
        self.finished.store(true, Ordering::Release);
        self.notify.notify_one();
    }

    pub(super) fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Acquire)
    }

    /// 请求体是否已被完整拉取
    pub(super) fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
            || self.expected.is_some_and(|len| self.bytes() >= len)
    }

    pub(super) async fn notified(&self) {
        self.notify.notified().await
    }
}

/// 包装请求体：每块数据计数，流结束时标记完成。
pub(super) fn counted<S>(
    source: S,
    counter: Arc<SendCounter>,
) -> impl Stream<Item = Result<Bytes, io::Error>> + Send + 'static
where
    S: Stream<Item = Result<Bytes, io::Error>> + Send + 'static,
{
    let on_chunk = Arc::clone(&counter);
    let end_marker = stream::once(async move { counter.finish() })
        .filter_map(|()| future::ready(None::<Result<Bytes, io::Error>>));

    source
        .inspect(move |item| {
            if let Ok(chunk) = item {
                on_chunk.add(chunk.len());
            }
        })
        .chain(end_marker)
}
