use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP 交换所处的阶段，与 HTTP 客户端上报的阶段一一对应。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransferStage {
    #[default]
    Idle,
    SendingRequest,
    SendingContent,
    WaitingForResponse,
    ReceivingResponse,
    ReceivingContent,
    Completed,
    Canceled,
    Error,
}

/// 输出变体名，供 UI 的阶段文本使用
impl fmt::Display for TransferStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "Idle",
            Self::SendingRequest => "SendingRequest",
            Self::SendingContent => "SendingContent",
            Self::WaitingForResponse => "WaitingForResponse",
            Self::ReceivingResponse => "ReceivingResponse",
            Self::ReceivingContent => "ReceivingContent",
            Self::Completed => "Completed",
            Self::Canceled => "Canceled",
            Self::Error => "Error",
        };
        f.write_str(name)
    }
}
