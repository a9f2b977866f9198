//! 流式上传器
//!
//! 把一个字节流 POST 到目标地址，过程中的每个阶段都交给 [`UploadProgressController`] 换算进度。
//!
//! ## 使用示例
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! # use post_progress::client::UploadClient;
//! # use post_progress::upload::{SlowBodyStream, StreamUploader, UploadProgressController};
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = UploadClient::new()?;
//! let controller = Arc::new(UploadProgressController::new());
//! let body = SlowBodyStream::default();
//! let len = body.len();
//!
//! let report = StreamUploader::new(&client, Arc::clone(&controller), "http://localhost:8080/upload")?
//!     .body(body.into_stream(), Some(len)) // 传 None 则以 chunked 方式发送
//!     .chunked_response(true)
//!     .with_on_progress_hook(|snapshot, pct| println!("{} {:?}", snapshot.stage, pct))
//!     .send()
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## 取消
//!
//! 其它任务调用 `controller.cancel_current()` 即可，上传返回 [`UploadError::Canceled`]；
//! 取消上下文是一次性的：下一次上传前需要 `controller.rearm()`，否则新会话一开始就是已取消的。

mod send_counter;
mod streaming_post;

use std::future::Future;
use std::io;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use reqwest::Client;
use url::Url;

use crate::internal::address::chunked_response_query::set_chunked_response_query;
use crate::internal::address::parse_http_uri::parse_http_uri;
use crate::internal::client::structs::upload_client::UploadClient;
use crate::internal::upload::traits::upload::{HookAbort, UploadHook};

use super::hook_adapters::{
    AfterCompleteHookAdapter, BeforeStartHookAdapter, OnProgressHookAdapter,
};
use super::progress_snapshot::ProgressSnapshot;
use super::transfer_stage::TransferStage;
use super::upload_error::UploadError;
use super::upload_hooks_container::UploadHooksContainer;
use super::upload_progress_controller::UploadProgressController;
use super::upload_report::UploadReport;
use streaming_post::{run_streaming_post, ProgressEmitter};

struct UploadBody {
    stream: BoxStream<'static, Result<Bytes, io::Error>>,
    length: Option<u64>,
}

/// 一次性上传器，`send` 后即被消耗。
pub struct StreamUploader {
    client: Client,
    controller: Arc<UploadProgressController>,
    address: Url,
    body: Option<UploadBody>,
    hooks: UploadHooksContainer,
}

impl StreamUploader {
    /// 校验地址并创建上传器；地址非法时直接返回 [`UploadError::InvalidInput`]，不会发起任何请求。
    pub fn new(
        client: &UploadClient,
        controller: Arc<UploadProgressController>,
        address: &str,
    ) -> Result<Self, UploadError> {
        let address = parse_http_uri(address)?;
        Ok(Self {
            client: client.client.clone(),
            controller,
            address,
            body: None,
            hooks: UploadHooksContainer::default(),
        })
    }

    /// 设置请求体；`length` 为 `None` 时以 chunked 方式发送，发送阶段不产生百分比。
    ///
    /// 不调用则发送空请求体。
    pub fn body<S>(mut self, stream: S, length: Option<u64>) -> Self
    where
        S: Stream<Item = Result<Bytes, io::Error>> + Send + 'static,
    {
        self.body = Some(UploadBody {
            stream: stream.boxed(),
            length,
        });
        self
    }

    /// 要求服务端以 chunked 方式返回响应体（通过查询串告知）。
    pub fn chunked_response(mut self, on: bool) -> Self {
        set_chunked_response_query(&mut self.address, on);
        self
    }

    /// 注册「开始前」钩子；闭包返回 `Err(HookAbort)` 会中止本次上传。
    pub fn with_before_start_hook<F, Fut>(mut self, f: F) -> Self
    where
        F: FnMut() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HookAbort>> + Send + 'static,
    {
        self.hooks.add(BeforeStartHookAdapter(f));
        self
    }

    /// 注册「进度」钩子；参数为控制器接受的快照和本次百分比（不更新时为 `None`）。
    pub fn with_on_progress_hook<F>(mut self, f: F) -> Self
    where
        F: FnMut(&ProgressSnapshot, Option<f64>) + Send + Sync + 'static,
    {
        self.hooks.add(OnProgressHookAdapter(f));
        self
    }

    /// 注册「完成后」钩子；上传成功结束后调用。
    pub fn with_after_complete_hook<F, Fut>(mut self, f: F) -> Self
    where
        F: FnMut() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.hooks.add(AfterCompleteHookAdapter(f));
        self
    }

    /// 添加完整钩子，在上传各阶段插入逻辑。
    pub fn with_hook(mut self, hook: impl UploadHook + 'static) -> Self {
        self.hooks.add(hook);
        self
    }

    /// 实际请求的地址（含查询串）
    pub fn address(&self) -> &Url {
        &self.address
    }

    pub fn controller(&self) -> Arc<UploadProgressController> {
        Arc::clone(&self.controller)
    }

    /// 执行上传。
    ///
    /// - 主动取消返回 [`UploadError::Canceled`]
    /// - 网络错误和非 2xx 状态码返回 [`UploadError::Request`]，内容就是 HTTP 客户端给出的错误
    pub async fn send(self) -> Result<UploadReport, UploadError> {
        let Self {
            client,
            controller,
            address,
            body,
            mut hooks,
        } = self;

        let (source, length) = match body {
            Some(b) => (b.stream, b.length),
            None => (stream::empty().boxed(), Some(0)),
        };

        let mut session = controller.start(length);

        if let Err(abort) = hooks.run_before_start().await {
            let outcome = Err(UploadError::from(abort));
            ProgressEmitter::new(&controller, &mut session, &mut hooks, length)
                .emit(TransferStage::Error);
            controller.finish(&mut session, &outcome);
            return outcome;
        }

        let mut emitter = ProgressEmitter::new(&controller, &mut session, &mut hooks, length);

        let outcome =
            run_streaming_post(&client, address, source, length, &mut emitter).await;

        let final_stage = match &outcome {
            Ok(_) => TransferStage::Completed,
            Err(UploadError::Canceled) => TransferStage::Canceled,
            Err(_) => TransferStage::Error,
        };
        emitter.emit(final_stage);

        controller.finish(&mut session, &outcome);

        if outcome.is_ok() {
            hooks.run_after_complete().await;
        }
        outcome
    }
}
