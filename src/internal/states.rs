//! 响应式状态：上传进度汇（UI 绑定）的底层容器。

pub mod reactive_core;
pub mod unlock_reactive;
