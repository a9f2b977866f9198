//! 上传领域模块：流式 POST 的进度跟踪与协作式取消。
//!
//! 使用方式：`StreamUploader::new(&client, controller, address)?.body(stream, len).send().await`
//! 对外导出以 [`crate::upload`] 为准，此处仅做模块划分。

pub mod structs;
pub mod traits;
