//! 单次流式 POST：发请求体、等响应头、收响应体，沿途把阶段和计数上报给控制器。

use std::io;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::stream::{BoxStream, StreamExt};
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Body, Client};
use tracing::debug;
use url::Url;

use crate::internal::upload::structs::{
    ProgressSnapshot, TransferSession, TransferStage, UploadError,
    UploadHooksContainer, UploadProgressController, UploadReport,
};

use super::send_counter::{counted, SendCounter};

/// 进度上报：维护当前快照，每次换阶段或计数变化时交给控制器和钩子。
pub(super) struct ProgressEmitter<'a> {
    pub(super) controller: &'a UploadProgressController,
    pub(super) session: &'a mut TransferSession,
    pub(super) hooks: &'a mut UploadHooksContainer,
    pub(super) snapshot: ProgressSnapshot,
}

impl<'a> ProgressEmitter<'a> {
    pub(super) fn new(
        controller: &'a UploadProgressController,
        session: &'a mut TransferSession,
        hooks: &'a mut UploadHooksContainer,
        length: Option<u64>,
    ) -> Self {
        Self {
            controller,
            session,
            hooks,
            snapshot: ProgressSnapshot {
                total_bytes_to_send: length,
                ..Default::default()
            },
        }
    }

    pub(super) fn emit(&mut self, stage: TransferStage) {
        self.snapshot.stage = stage;
        let pct = self.controller.on_progress(&mut *self.session, self.snapshot);
        // 钩子拿到的是控制器校正过的快照
        let accepted = *self.session.latest();
        self.hooks.run_on_progress(&accepted, pct);
    }

    /// 请求体拉取进度；流结束后补一条 WaitingForResponse
    fn on_body_progress(&mut self, bytes_sent: u64, finished: bool) {
        if bytes_sent != self.snapshot.bytes_sent {
            self.snapshot.bytes_sent = bytes_sent;
            self.emit(TransferStage::SendingContent);
        }
        if finished && self.snapshot.stage != TransferStage::WaitingForResponse {
            self.emit(TransferStage::WaitingForResponse);
        }
    }
}

/// 执行一次流式 POST。
///
/// `length` 为 `None` 时不带 Content-Length，请求体以 chunked 方式发送。
/// 取消在每个等待点都优先检查（`biased`），一旦观察到就丢弃请求，连接随之中断。
pub(super) async fn run_streaming_post(
    client: &Client,
    address: Url,
    source: BoxStream<'static, Result<Bytes, io::Error>>,
    length: Option<u64>,
    emitter: &mut ProgressEmitter<'_>,
) -> Result<UploadReport, UploadError> {
    let token = emitter.session.cancel_token().clone();
    if token.is_cancelled() {
        return Err(UploadError::Canceled);
    }

    emitter.emit(TransferStage::SendingRequest);

    let counter = Arc::new(SendCounter::new(length));
    let body = Body::wrap_stream(counted(source, Arc::clone(&counter)));
    let mut request = client.post(address).body(body);
    if let Some(len) = length {
        request = request.header(CONTENT_LENGTH, len);
    }

    let send = request.send();
    tokio::pin!(send);

    let response = loop {
        tokio::select! {
            biased;

            _ = token.cancelled() => return Err(UploadError::Canceled),
            result = &mut send => break result?,
            _ = counter.notified() => {
                emitter.on_body_progress(counter.bytes(), counter.is_finished());
            }
        }
    };
    // 响应头先到时，把还没上报的发送进度补上
    emitter.on_body_progress(counter.bytes(), counter.is_finished());

    let status = response.status();
    debug!(%status, content_length = ?response.content_length(), "收到响应头");

    emitter.snapshot.total_bytes_to_receive = response.content_length();
    emitter.emit(TransferStage::ReceivingResponse);

    // 非 2xx 也把响应体收完，再把客户端给出的错误原样交出去
    let status_error = response.error_for_status_ref().err();

    let mut stream = response.bytes_stream();
    loop {
        tokio::select! {
            biased;

            _ = token.cancelled() => return Err(UploadError::Canceled),
            chunk = stream.next() => match chunk {
                Some(chunk) => {
                    let chunk = chunk?;
                    emitter.snapshot.bytes_received += chunk.len() as u64;
                    emitter.emit(TransferStage::ReceivingContent);
                }
                None => break,
            }
        }
    }

    if let Some(e) = status_error {
        return Err(UploadError::Request(e));
    }

    Ok(UploadReport {
        status,
        bytes_sent: emitter.snapshot.bytes_sent,
        bytes_received: emitter.snapshot.bytes_received,
    })
}
