//! 上传相关 trait：钩子接口，供上传器在各阶段调用。

use async_trait::async_trait;

use crate::internal::upload::structs::progress_snapshot::ProgressSnapshot;

/// 钩子执行时请求中止上传时使用的错误。
#[derive(Debug, Clone)]
pub struct HookAbort;

impl std::fmt::Display for HookAbort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("上传被钩子中止")
    }
}

impl std::error::Error for HookAbort {}

/// 上传流程钩子：在「开始前 / 进度 / 完成后」插入自定义逻辑。
///
/// 使用方式二选一（可混用）：
/// - **单阶段**：用 `with_before_start_hook` / `with_on_progress_hook` / `with_after_complete_hook` 传入闭包；
/// - **完整钩子**：实现本 trait，通过上传器的 `with_hook` 注册。
#[async_trait]
pub trait UploadHook: Send + Sync {
    /// 发请求前调用。返回 `Err` 则中止本次上传。
    async fn before_start(&mut self) -> Result<(), HookAbort> {
        Ok(())
    }

    /// 每条进度快照都会调用；`percentage` 为 `None` 表示该阶段不更新进度条。
    fn on_progress(&mut self, _snapshot: &ProgressSnapshot, _percentage: Option<f64>) {}

    /// 上传成功结束后调用。
    async fn after_complete(&mut self) {}
}
