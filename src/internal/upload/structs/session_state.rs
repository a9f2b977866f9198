/// 传输会话的生命周期状态
///
/// `Idle → Active → {Completed | Canceled | Error}`，终态只能通过 reset 或新的 start 离开。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Active,
    Completed,
    Canceled,
    Error,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Canceled | Self::Error)
    }
}
