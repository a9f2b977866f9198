//! 上传器测试：基于本地桩服务跑完整的流式 POST，检查阶段顺序、百分比、取消与失败透传。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::client::UploadClient;
use crate::tests::http_stub::{HttpStub, StubResponse};
use crate::tests::init_tracing;
use crate::upload::{
    HookAbort, ProgressSnapshot, SlowBodyStream, StreamUploader, TransferStage,
    UploadError, UploadProgressController,
};

type Recorded = Arc<Mutex<Vec<(ProgressSnapshot, Option<f64>)>>>;

/// 快速的请求体：不等待，每块 4096 字节
fn fast_body(total: u64) -> SlowBodyStream {
    SlowBodyStream::new(total)
        .chunk_size(4096)
        .delay(Duration::ZERO)
}

fn recorder() -> (Recorded, impl FnMut(&ProgressSnapshot, Option<f64>) + Send + Sync + 'static) {
    let recorded: Recorded = Arc::default();
    let sink = Arc::clone(&recorded);
    let hook = move |snapshot: &ProgressSnapshot, pct: Option<f64>| {
        sink.lock().unwrap().push((*snapshot, pct));
    };
    (recorded, hook)
}

fn stages(recorded: &Recorded) -> Vec<TransferStage> {
    let mut stages: Vec<TransferStage> = recorded.lock().unwrap().iter().map(|(s, _)| s.stage).collect();
    stages.dedup();
    stages
}

#[tokio::test]
async fn sized_upload_walks_every_stage_and_completes() {
    init_tracing();
    let mut stub = HttpStub::start(StubResponse::ok(30_000)).await.unwrap();
    let client = UploadClient::new().unwrap();
    let controller = Arc::new(UploadProgressController::new());
    let (recorded, hook) = recorder();

    let report = StreamUploader::new(&client, Arc::clone(&controller), &stub.url("/upload"))
        .unwrap()
        .body(fast_body(100_000).into_stream(), Some(100_000))
        .with_on_progress_hook(hook)
        .send()
        .await
        .unwrap();

    assert!(report.status.is_success());
    assert_eq!(report.bytes_sent, 100_000);
    assert_eq!(report.bytes_received, 30_000);

    let request = stub.next_request().await.unwrap();
    assert_eq!(request.method, "POST");
    assert_eq!(request.content_length, Some(100_000));
    assert!(!request.chunked);
    assert_eq!(request.body_len, 100_000);

    assert_eq!(
        stages(&recorded),
        vec![
            TransferStage::SendingRequest,
            TransferStage::SendingContent,
            TransferStage::WaitingForResponse,
            TransferStage::ReceivingResponse,
            TransferStage::ReceivingContent,
            TransferStage::Completed,
        ]
    );

    let recorded = recorded.lock().unwrap();
    let pcts: Vec<f64> = recorded.iter().filter_map(|(_, p)| *p).collect();
    assert!(pcts.windows(2).all(|w| w[0] <= w[1]), "百分比回退: {pcts:?}");
    assert!(pcts.contains(&50.0));
    assert_eq!(pcts.last(), Some(&100.0));

    let fields = controller.progress().get_current().unwrap();
    assert_eq!(fields.stage, "Completed");
    assert_eq!(fields.percentage, 100.0);
}

#[tokio::test]
async fn chunked_request_never_reports_send_percentage() {
    let mut stub = HttpStub::start(StubResponse::ok(10)).await.unwrap();
    let client = UploadClient::new().unwrap();
    let controller = Arc::new(UploadProgressController::new());
    let (recorded, hook) = recorder();

    let report = StreamUploader::new(&client, controller, &stub.url("/upload"))
        .unwrap()
        .body(fast_body(50_000).into_stream(), None)
        .with_on_progress_hook(hook)
        .send()
        .await
        .unwrap();

    assert_eq!(report.bytes_sent, 50_000);

    let request = stub.next_request().await.unwrap();
    assert!(request.chunked);
    assert_eq!(request.content_length, None);
    assert_eq!(request.body_len, 50_000);

    let recorded = recorded.lock().unwrap();
    let sending: Vec<_> = recorded
        .iter()
        .filter(|(s, _)| s.stage == TransferStage::SendingContent)
        .collect();
    assert!(!sending.is_empty());
    assert!(sending.iter().all(|(s, p)| p.is_none() && s.total_bytes_to_send.is_none()));
}

#[tokio::test]
async fn chunked_response_holds_at_fifty_until_complete() {
    let mut stub = HttpStub::start(StubResponse::ok(5000)).await.unwrap();
    let client = UploadClient::new().unwrap();
    let controller = Arc::new(UploadProgressController::new());
    let (recorded, hook) = recorder();

    let uploader = StreamUploader::new(&client, Arc::clone(&controller), &stub.url("/upload"))
        .unwrap()
        .chunked_response(true);
    assert_eq!(uploader.address().query(), Some("chunkedResponse=1"));

    let report = uploader
        .body(fast_body(1000).into_stream(), Some(1000))
        .with_on_progress_hook(hook)
        .send()
        .await
        .unwrap();
    assert_eq!(report.bytes_received, 5000);

    let request = stub.next_request().await.unwrap();
    assert_eq!(request.target, "/upload?chunkedResponse=1");

    let recorded = recorded.lock().unwrap();
    let receiving: Vec<_> = recorded
        .iter()
        .filter(|(s, _)| s.stage == TransferStage::ReceivingContent)
        .collect();
    assert!(!receiving.is_empty());
    assert!(receiving.iter().all(|(s, p)| *p == Some(50.0) && s.total_bytes_to_receive.is_none()));
    assert_eq!(controller.progress().get_current().unwrap().percentage, 100.0);
}

#[tokio::test]
async fn non_success_status_is_passed_through() {
    let stub = HttpStub::start(StubResponse::status(404, "missing")).await.unwrap();
    let url = stub.url("/nowhere");

    let client = UploadClient::new().unwrap();
    let controller = Arc::new(UploadProgressController::new());
    let completed = Arc::new(AtomicBool::new(false));
    let completed_flag = Arc::clone(&completed);

    let err = StreamUploader::new(&client, Arc::clone(&controller), &url)
        .unwrap()
        .body(fast_body(2000).into_stream(), Some(2000))
        .with_after_complete_hook(move || {
            let flag = Arc::clone(&completed_flag);
            async move { flag.store(true, Ordering::SeqCst) }
        })
        .send()
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::Request(_)), "{err:?}");
    assert!(!err.is_canceled());
    assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
    assert!(!completed.load(Ordering::SeqCst));

    // 错误响应体也是完整收下的，百分比照常算到 100，结果靠阶段区分
    let fields = controller.progress().get_current().unwrap();
    assert_eq!(fields.stage, "Error");
    assert_eq!(fields.bytes_received, "7");
    assert_eq!(fields.total_bytes_to_receive, "7");
    assert_eq!(fields.percentage, 100.0);
}

#[tokio::test]
async fn cancel_mid_body_reports_canceled_and_needs_rearm() {
    init_tracing();
    let mut stub = HttpStub::start(StubResponse::ok(10)).await.unwrap();
    let client = UploadClient::new().unwrap();
    let controller = Arc::new(UploadProgressController::new());

    let canceller = Arc::clone(&controller);
    let slow = SlowBodyStream::new(100_000).delay(Duration::from_millis(5));
    let err = StreamUploader::new(&client, Arc::clone(&controller), &stub.url("/upload"))
        .unwrap()
        .body(slow.into_stream(), Some(100_000))
        .with_on_progress_hook(move |snapshot, _| {
            if snapshot.bytes_sent >= 10_000 {
                canceller.cancel_current();
                // 重复取消没有额外效果
                canceller.cancel_current();
            }
        })
        .send()
        .await
        .unwrap_err();

    assert!(err.is_canceled(), "{err:?}");
    let fields = controller.progress().get_current().unwrap();
    assert_eq!(fields.stage, "Canceled");
    assert!(fields.percentage < 50.0);
    assert!(stub.try_next_request().is_none(), "请求体不应被完整发送");

    // 没有 rearm：新会话一开始就是已取消的
    let err = StreamUploader::new(&client, Arc::clone(&controller), &stub.url("/upload"))
        .unwrap()
        .body(fast_body(10).into_stream(), Some(10))
        .send()
        .await
        .unwrap_err();
    assert!(err.is_canceled());

    controller.rearm();
    let report = StreamUploader::new(&client, Arc::clone(&controller), &stub.url("/upload"))
        .unwrap()
        .body(fast_body(10).into_stream(), Some(10))
        .send()
        .await
        .unwrap();
    assert_eq!(report.bytes_sent, 10);
    assert_eq!(stub.next_request().await.unwrap().body_len, 10);
}

#[tokio::test]
async fn before_start_hook_can_abort() {
    let mut stub = HttpStub::start(StubResponse::ok(10)).await.unwrap();
    let client = UploadClient::new().unwrap();
    let controller = Arc::new(UploadProgressController::new());

    let err = StreamUploader::new(&client, Arc::clone(&controller), &stub.url("/upload"))
        .unwrap()
        .with_before_start_hook(|| async { Err(HookAbort) })
        .send()
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::HookAbort(_)));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(stub.try_next_request().is_none());

    let fields = controller.progress().get_current().unwrap();
    assert_eq!(fields.stage, "Error");
    assert_eq!(fields.percentage, 0.0);
}

#[tokio::test]
async fn empty_body_and_after_complete_hook() {
    let mut stub = HttpStub::start(StubResponse::ok(0)).await.unwrap();
    let client = UploadClient::new().unwrap();
    let controller = Arc::new(UploadProgressController::new());
    let completed = Arc::new(AtomicBool::new(false));
    let completed_flag = Arc::clone(&completed);

    let report = StreamUploader::new(&client, Arc::clone(&controller), &stub.url("/empty"))
        .unwrap()
        .with_after_complete_hook(move || {
            let flag = Arc::clone(&completed_flag);
            async move { flag.store(true, Ordering::SeqCst) }
        })
        .send()
        .await
        .unwrap();

    assert_eq!(report.bytes_sent, 0);
    assert_eq!(report.bytes_received, 0);
    assert!(completed.load(Ordering::SeqCst));
    assert_eq!(stub.next_request().await.unwrap().body_len, 0);
    assert_eq!(controller.progress().get_current().unwrap().percentage, 100.0);
}

#[tokio::test]
async fn invalid_address_fails_before_any_request() {
    let client = UploadClient::new().unwrap();
    let controller = Arc::new(UploadProgressController::new());

    for address in ["", "not a url", "/relative/path", "ftp://example.com/file"] {
        let result = StreamUploader::new(&client, Arc::clone(&controller), address);
        assert!(
            matches!(result, Err(UploadError::InvalidInput(_))),
            "{address:?} 应被拒绝"
        );
    }
    assert_eq!(controller.progress().get_current().unwrap().stage, "");
}
