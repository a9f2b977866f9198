//! # ReactiveProperty — 响应式属性内核
//!
//! [`UnlockReactiveProperty`](super::unlock_reactive::UnlockReactiveProperty) 的实现。
//! 控制器把每次进度计算的结果写进来，UI 侧通过 [`ReactiveProperty::watch`] 监听。

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::sync::watch::error::RecvError;

// ──────────────────────────── Error ────────────────────────────

/// 响应式属性统一错误类型
#[derive(Debug, Error)]
pub enum ReactivePropertyError {
    /// 属性已被销毁，监听器收到了关闭信号
    #[error("监听器已被销毁")]
    WatcherClosed,

    /// watch 通道接收失败
    #[error("接收失败: {0}")]
    RecvError(#[from] RecvError),
}

// ──────────────────────────── Inner ────────────────────────────

/// 内部共享状态，只由属性本身（及其克隆）持有。
///
/// 最后一个属性句柄释放时发出 `None` 并关闭通道，监听器随之收到关闭信号。
#[derive(Debug)]
pub(crate) struct Inner<T> {
    pub(crate) sender: watch::Sender<Option<T>>,
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        let _ = self.sender.send(None);
    }
}

// ──────────────────────────── ReactiveProperty ────────────────────────────

/// 响应式属性：new / update / update_field / get_current / watch。
#[derive(Clone, Debug)]
pub struct ReactiveProperty<T: Clone + Send + Sync> {
    pub(crate) inner: Arc<Inner<T>>,
    pub(crate) cache_receiver: watch::Receiver<Option<T>>,
}

impl<T> ReactiveProperty<T>
where
    T: Clone + Send + Sync,
{
    /// 创建一个新的响应式属性。
    pub fn new(value: T) -> Self {
        let (sender, _) = watch::channel(Some(value));
        let cache_receiver = sender.subscribe();
        Self {
            inner: Arc::new(Inner { sender }),
            cache_receiver,
        }
    }

    /// 整体替换属性的值，所有监听者都会收到通知。
    ///
    /// 没有监听者时也会写入，后续的 `get_current` 能读到。
    pub fn update(
        &self,
        new_value: T,
    ) -> Result<&Self, ReactivePropertyError> {
        self.inner.sender.send_replace(Some(new_value));
        Ok(self)
    }

    /// 使用闭包原地修改部分字段（如只改百分比，保留其余文本字段）。
    pub fn update_field<F, R>(
        &self,
        updater: F,
    ) -> Result<&Self, ReactivePropertyError>
    where
        F: FnOnce(&mut T) -> R,
    {
        self.inner.sender.send_if_modified(|slot| match slot {
            Some(current) => {
                updater(current);
                true
            }
            None => false,
        });
        Ok(self)
    }

    /// 获取当前属性值的快照（会 clone）。
    pub fn get_current(&self) -> Option<T> {
        self.cache_receiver
            .borrow()
            .as_ref()
            .cloned()
    }

    /// 获取当前值，没有值时返回默认值。
    pub fn get_or_default(&self) -> T
    where
        T: Default,
    {
        self.get_current().unwrap_or_default()
    }

    /// 创建一个监听器，用于异步监听属性值的变化。
    ///
    /// 监听器不延长属性的生命周期：属性全部释放后 `changed` 返回错误。
    pub fn watch(&self) -> PropertyWatcher<T> {
        PropertyWatcher {
            receiver: self.inner.sender.subscribe(),
        }
    }
}

// ──────────────────────────── PropertyWatcher ────────────────────────────

/// 属性监听器，用于异步接收属性值的变化。
///
/// 只保证拿到“最新值”，中间值可能被合并，进度条只关心最新值。
pub struct PropertyWatcher<T> {
    receiver: watch::Receiver<Option<T>>,
}

impl<T> PropertyWatcher<T>
where
    T: Clone + Send + Sync,
{
    /// 异步等待属性值的变化，返回新值。
    ///
    /// 属性已销毁时返回 [`ReactivePropertyError::WatcherClosed`]（或通道关闭的 `RecvError`）。
    pub async fn changed(&mut self) -> Result<T, ReactivePropertyError> {
        self.receiver.changed().await?;
        match self.receiver.borrow_and_update().as_ref() {
            None => Err(ReactivePropertyError::WatcherClosed),
            Some(value) => Ok(value.clone()),
        }
    }

    /// 同步获取当前值的克隆。
    pub fn borrow(&self) -> Option<T> {
        self.receiver.borrow().clone()
    }
}
