//! # UnlockReactiveProperty
//!
//! 基于 [`tokio::sync::watch`] 的响应式属性容器，读写都不阻塞，
//! 上传进度汇（[`ProgressFields`](crate::upload::ProgressFields)）就放在这里。
//!
//! ## 使用示例
//! ```rust,no_run
//! use post_progress::states::unlock_reactive::UnlockReactiveProperty;
//!
//! let prop = UnlockReactiveProperty::new(0);
//! prop.update(1).unwrap();
//! prop.update(2).unwrap();
//! ```

pub use super::reactive_core::{PropertyWatcher, ReactivePropertyError as UnlockReactivePropertyError};

/// 轻量级响应式属性容器。
///
/// 纯通知机制，适合进度条这类高频写、少量读的场景：
/// 写入只替换 watch 通道里的最新值，不排队，不会因为进度事件过密而无限增长。
pub type UnlockReactiveProperty<T> = super::reactive_core::ReactiveProperty<T>;
