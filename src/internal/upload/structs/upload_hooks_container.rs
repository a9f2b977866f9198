use crate::internal::upload::structs::progress_snapshot::ProgressSnapshot;
use crate::internal::upload::traits::upload::{HookAbort, UploadHook};

/// 钩子容器：按注册顺序依次执行。
#[derive(Default)]
pub struct UploadHooksContainer {
    hooks: Vec<Box<dyn UploadHook>>,
}

impl UploadHooksContainer {
    /// 添加一个上传钩子；支持多次调用以注册多个钩子。
    pub fn add(&mut self, hook: impl UploadHook + 'static) {
        self.hooks.push(Box::new(hook));
    }

    pub async fn run_before_start(&mut self) -> Result<(), HookAbort> {
        for h in self.hooks.iter_mut() {
            h.before_start().await?;
        }
        Ok(())
    }

    pub fn run_on_progress(
        &mut self,
        snapshot: &ProgressSnapshot,
        percentage: Option<f64>,
    ) {
        for h in self.hooks.iter_mut() {
            h.on_progress(snapshot, percentage);
        }
    }

    pub async fn run_after_complete(&mut self) {
        for h in self.hooks.iter_mut() {
            h.after_complete().await;
        }
    }
}
