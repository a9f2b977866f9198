//! 上传相关错误类型。

use thiserror::Error;

use crate::internal::upload::traits::upload::HookAbort;

#[derive(Debug, Error)]
pub enum UploadError {
    /// 地址等输入非法，在传输开始之前返回
    #[error("输入非法: {0}")]
    InvalidInput(String),

    /// 调用方主动取消
    #[error("上传被取消")]
    Canceled,

    /// HTTP 客户端报告的失败（网络错误、非 2xx 状态码），原样透传
    #[error("HTTP 请求失败: {0}")]
    Request(#[from] reqwest::Error),

    #[error("创建 HTTP 客户端失败: {0}")]
    ClientBuild(String),

    /// 钩子在 before_start 中返回错误，中止上传。
    #[error("{0}")]
    HookAbort(#[from] HookAbort),
}

impl UploadError {
    /// 是否为主动取消，取消需要和一般的传输失败区分展示
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }

    /// 失败时服务端返回的状态码（仅非 2xx 导致的失败才有）
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Request(e) => e.status(),
            _ => None,
        }
    }
}
