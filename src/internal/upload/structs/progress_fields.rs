use serde::{Deserialize, Serialize};

use super::progress_snapshot::ProgressSnapshot;

/// 总量未知时显示的文本
pub const UNKNOWN_TOTAL: &str = "unknown";

/// UI 绑定收到的进度字段。
///
/// 计数都转成文本，和界面上的输入框一一对应；百分比单独给进度条。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressFields {
    pub stage: String,
    pub retries: String,
    pub bytes_sent: String,
    pub total_bytes_to_send: String,
    pub bytes_received: String,
    pub total_bytes_to_receive: String,
    /// 0～100
    pub percentage: f64,
}

/// 开始新一次传输前界面上的初始值
impl Default for ProgressFields {
    fn default() -> Self {
        Self {
            stage: String::new(),
            retries: "0".to_string(),
            bytes_sent: "0".to_string(),
            total_bytes_to_send: "0".to_string(),
            bytes_received: "0".to_string(),
            total_bytes_to_receive: "0".to_string(),
            percentage: 0.0,
        }
    }
}

impl ProgressFields {
    /// 用快照刷新文本字段，百分比保持不变。
    pub fn apply_snapshot(&mut self, snapshot: &ProgressSnapshot) {
        self.stage = snapshot.stage.to_string();
        self.retries = snapshot.retries.to_string();
        self.bytes_sent = snapshot.bytes_sent.to_string();
        self.total_bytes_to_send = total_text(snapshot.total_bytes_to_send);
        self.bytes_received = snapshot.bytes_received.to_string();
        self.total_bytes_to_receive = total_text(snapshot.total_bytes_to_receive);
    }
}

fn total_text(total: Option<u64>) -> String {
    match total {
        Some(t) => t.to_string(),
        None => UNKNOWN_TOTAL.to_string(),
    }
}
