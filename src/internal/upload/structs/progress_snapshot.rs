use serde::{Deserialize, Serialize};

use super::transfer_stage::TransferStage;

/// 某一时刻的传输进度，由 HTTP 客户端一侧产生，不可变。
///
/// 总大小为 `None` 表示未知（例如 chunked 传输）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub stage: TransferStage,
    /// 客户端内部重试次数，仅作展示
    pub retries: u32,
    pub bytes_sent: u64,
    pub total_bytes_to_send: Option<u64>,
    pub bytes_received: u64,
    pub total_bytes_to_receive: Option<u64>,
}

impl ProgressSnapshot {
    /// 某阶段的空快照
    pub fn at_stage(stage: TransferStage) -> Self {
        Self {
            stage,
            ..Default::default()
        }
    }

    /// 已发送字节数是否超过了已知总量
    pub fn is_send_overflowed(&self) -> bool {
        self.total_bytes_to_send
            .is_some_and(|total| self.bytes_sent > total)
    }

    /// 已接收字节数是否超过了已知总量
    pub fn is_receive_overflowed(&self) -> bool {
        self.total_bytes_to_receive
            .is_some_and(|total| self.bytes_received > total)
    }

    /// 把越界的计数压回已知总量以内。
    ///
    /// 正常情况下不会越界；真出现时记一条警告继续走，不中断传输。
    pub fn clamped(mut self) -> Self {
        if let Some(total) = self.total_bytes_to_send.filter(|_| self.is_send_overflowed()) {
            tracing::warn!(
                bytes_sent = self.bytes_sent,
                total,
                "已发送字节数超过总量，按总量处理"
            );
            self.bytes_sent = total;
        }
        if let Some(total) = self.total_bytes_to_receive.filter(|_| self.is_receive_overflowed()) {
            tracing::warn!(
                bytes_received = self.bytes_received,
                total,
                "已接收字节数超过总量，按总量处理"
            );
            self.bytes_received = total;
        }
        self
    }
}
