use tokio_util::sync::CancellationToken;

use super::progress_snapshot::ProgressSnapshot;
use super::session_state::SessionState;

/// 一次传输的会话，由 [`UploadProgressController::start`](super::UploadProgressController::start) 创建。
///
/// 持有本次传输的取消上下文和最近一次快照；不实现 Clone，一次传输只能有一个会话。
#[derive(Debug)]
pub struct TransferSession {
    pub(crate) state: SessionState,
    pub(crate) cancel_token: CancellationToken,
    pub(crate) body_size: Option<u64>,
    pub(crate) latest: ProgressSnapshot,
    pub(crate) percentage: f64,
}

impl TransferSession {
    pub(crate) fn new(
        cancel_token: CancellationToken,
        body_size: Option<u64>,
    ) -> Self {
        Self {
            state: SessionState::Active,
            cancel_token,
            body_size,
            latest: ProgressSnapshot {
                total_bytes_to_send: body_size,
                ..Default::default()
            },
            percentage: 0.0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// 取消标志是否已置位
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// 请求体大小，`None` 表示 chunked 发送
    pub fn body_size(&self) -> Option<u64> {
        self.body_size
    }

    /// 是否以 chunked 方式发送请求体
    pub fn is_chunked(&self) -> bool {
        self.body_size.is_none()
    }

    /// 最近一次收到的快照
    pub fn latest(&self) -> &ProgressSnapshot {
        &self.latest
    }

    /// 最近一次发出的百分比
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    /// 会话持有的取消上下文，传输一侧用它观察取消请求
    pub(crate) fn cancel_token(&self) -> &CancellationToken {
        &self.cancel_token
    }
}
