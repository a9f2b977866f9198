//! 上传进度控制器
//!
//! 把 HTTP 客户端上报的 [`ProgressSnapshot`] 序列换算成一个 0～100 的百分比，
//! 并管理本次传输的取消上下文。
//!
//! ## 百分比规则
//!
//! - 发送请求体（`SendingContent`）占前 50：`bytes_sent * 50 / total`，总量未知时不更新
//! - 接收响应体（`ReceivingContent`）从 50 起步：总量已知时再加 `bytes_received * 50 / total`，未知时停在 50
//! - 其它阶段不产生百分比，调用方保留上一次的值
//!
//! 除法在整数域内截断，结果与界面上进度条的整数刻度保持一致。
//!
//! ## 取消
//!
//! 取消上下文是一次性的：触发之后不能复用，只能通过 [`UploadProgressController::reset`] 整体换新。

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::internal::states::unlock_reactive::UnlockReactiveProperty;

use super::progress_fields::ProgressFields;
use super::progress_snapshot::ProgressSnapshot;
use super::session_state::SessionState;
use super::transfer_session::TransferSession;
use super::transfer_stage::TransferStage;
use super::upload_error::UploadError;
use super::upload_report::UploadReport;

/// 发送阶段和接收阶段各占的百分比
const PHASE_SHARE: u64 = 50;

/// 按快照计算百分比；不产生更新的阶段返回 `None`。
pub fn percentage(snapshot: &ProgressSnapshot) -> Option<f64> {
    match snapshot.stage {
        TransferStage::SendingContent => snapshot
            .total_bytes_to_send
            .filter(|&total| total > 0)
            .map(|total| phase_share(snapshot.bytes_sent, total) as f64),
        TransferStage::ReceivingContent => {
            let received = snapshot
                .total_bytes_to_receive
                .filter(|&total| total > 0)
                .map(|total| phase_share(snapshot.bytes_received, total))
                .unwrap_or(0);
            Some((PHASE_SHARE + received) as f64)
        }
        _ => None,
    }
}

/// `done * 50 / total`，截断取整，最多 50
fn phase_share(done: u64, total: u64) -> u64 {
    let scaled =
        u128::from(done.min(total)) * u128::from(PHASE_SHARE) / u128::from(total);
    scaled as u64
}

/// 上传进度控制器：同一时刻只跟踪一次传输。
#[derive(Debug)]
pub struct UploadProgressController {
    /// 当前武装着的取消上下文；start 时交给会话，reset 时整体替换
    cancel_context: Mutex<CancellationToken>,
    /// 进度汇，UI 通过 `progress().watch()` 监听
    progress: UnlockReactiveProperty<ProgressFields>,
}

impl Default for UploadProgressController {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadProgressController {
    pub fn new() -> Self {
        Self {
            cancel_context: Mutex::new(CancellationToken::new()),
            progress: UnlockReactiveProperty::new(ProgressFields::default()),
        }
    }

    fn context(&self) -> MutexGuard<'_, CancellationToken> {
        // 锁内只有替换/克隆 token，不会留下半更新状态，中毒了照常用
        self.cancel_context
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// 开始跟踪一次传输，所有计数归零。
    ///
    /// `body_size` 为 `None` 时按 chunked 发送处理。
    /// 会话沿用当前的取消上下文：取消之后没有 reset 就 start，得到的会话一开始就是已取消的。
    pub fn start(&self, body_size: Option<u64>) -> TransferSession {
        let token = self.context().clone();
        let _ = self.progress.update(ProgressFields::default());
        debug!(?body_size, pre_cancelled = token.is_cancelled(), "开始跟踪上传");
        TransferSession::new(token, body_size)
    }

    /// 处理一条进度快照，返回新的百分比；该阶段不产生百分比时返回 `None`。
    ///
    /// 不阻塞、不排队，可以在客户端投递进度的任意任务上高频调用。
    pub fn on_progress(
        &self,
        session: &mut TransferSession,
        mut snapshot: ProgressSnapshot,
    ) -> Option<f64> {
        // chunked 会话的发送总量永远未知
        if session.is_chunked() {
            snapshot.total_bytes_to_send = None;
        }
        let snapshot = snapshot.clamped();
        let pct = percentage(&snapshot);

        session.latest = snapshot;
        if let Some(p) = pct {
            session.percentage = p;
        }

        let _ = self.progress.update_field(|fields| {
            fields.apply_snapshot(&snapshot);
            if let Some(p) = pct {
                fields.percentage = p;
            }
        });

        trace!(
            stage = %snapshot.stage,
            bytes_sent = snapshot.bytes_sent,
            bytes_received = snapshot.bytes_received,
            ?pct,
            "上传进度"
        );
        pct
    }

    /// 请求取消会话对应的传输。重复调用没有额外效果。
    pub fn cancel(&self, session: &TransferSession) {
        if !session.cancel_token.is_cancelled() {
            debug!("请求取消上传");
        }
        session.cancel_token.cancel();
    }

    /// 取消当前武装着的上下文，不需要持有会话（例如页面离开时）。
    pub fn cancel_current(&self) {
        let token = self.context();
        if !token.is_cancelled() {
            debug!("请求取消当前上传");
        }
        token.cancel();
    }

    /// 当前上下文是否已被取消（还没 reset）
    pub fn is_cancel_requested(&self) -> bool {
        self.context().is_cancelled()
    }

    /// 当前上下文已被取消时换上一个全新的，返回此后武装着的上下文。
    ///
    /// 不持有会话时（例如只拿着上传器）用这个。上下文还没触发时原样保留，
    /// 正在进行的传输仍能被 [`cancel_current`](Self::cancel_current) 取消。
    pub fn rearm(&self) -> CancellationToken {
        let mut token = self.context();
        if token.is_cancelled() {
            *token = CancellationToken::new();
            debug!("取消上下文已重建");
        }
        token.clone()
    }

    /// 换上一个全新的取消上下文，会话回到 Idle。
    ///
    /// 已触发的上下文不能清除，只能替换；之后的 start 不会继承取消状态。
    pub fn reset(&self, session: &mut TransferSession) {
        let fresh = CancellationToken::new();
        *self.context() = fresh.clone();
        session.cancel_token = fresh;
        session.state = SessionState::Idle;
        session.latest = ProgressSnapshot::default();
        session.percentage = 0.0;
        debug!("取消上下文已重建");
    }

    /// 根据传输结果把会话推进到终态，返回终态。
    ///
    /// 成功时进度条补满到 100；已经是终态的会话保持不变。
    pub fn finish(
        &self,
        session: &mut TransferSession,
        outcome: &Result<UploadReport, UploadError>,
    ) -> SessionState {
        if session.state.is_terminal() {
            return session.state;
        }

        session.state = match outcome {
            Ok(_) => SessionState::Completed,
            Err(UploadError::Canceled) => SessionState::Canceled,
            Err(_) => SessionState::Error,
        };

        if session.state == SessionState::Completed {
            session.percentage = 100.0;
            let _ = self.progress.update_field(|fields| fields.percentage = 100.0);
        }

        debug!(state = ?session.state, "上传结束");
        session.state
    }

    /// 进度汇；返回可共享句柄，`.watch()` 后 `changed().await` 监听进度。
    pub fn progress(&self) -> UnlockReactiveProperty<ProgressFields> {
        self.progress.clone()
    }
}
