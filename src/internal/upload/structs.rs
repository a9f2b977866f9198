pub mod hook_adapters;
pub mod progress_fields;
pub mod progress_snapshot;
pub mod session_state;
pub mod slow_body_stream;
pub mod stream_uploader;
pub mod transfer_session;
pub mod transfer_stage;
pub mod upload_error;
pub mod upload_hooks_container;
pub mod upload_progress_controller;
pub mod upload_report;

// 重导出公共类型
pub use progress_fields::ProgressFields;
pub use progress_snapshot::ProgressSnapshot;
pub use session_state::SessionState;
pub use slow_body_stream::SlowBodyStream;
pub use stream_uploader::StreamUploader;
pub use transfer_session::TransferSession;
pub use transfer_stage::TransferStage;
pub use upload_error::UploadError;
pub use upload_hooks_container::UploadHooksContainer;
pub use upload_progress_controller::{percentage, UploadProgressController};
pub use upload_report::UploadReport;
