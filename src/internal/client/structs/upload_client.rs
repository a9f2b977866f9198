use core::fmt;
use std::sync::Arc;

use base64::Engine;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
};
use sha2::{Digest, Sha256};

use crate::internal::upload::structs::upload_error::UploadError;

/// 上传客户端
///
/// - 持有实际发请求的 [`reqwest::Client`]，只走 HTTP/1
/// - 可选 Basic 认证，认证头作为默认请求头带在每个请求上
///
/// 默认Eq时只比较认证token的指纹，匿名客户端之间互相相等
#[derive(Clone)]
pub struct UploadClient {
    pub client: Client, // 内部是Arc，不需要特殊处理
    pub(crate) token_fingerprint: Option<Arc<String>>, // 对外不暴露，哪怕它是哈希过的
}

impl UploadClient {
    /// 创建匿名客户端
    pub fn new() -> Result<Self, UploadError> {
        let client = _build_client(HeaderMap::new())?;
        Ok(Self {
            client,
            token_fingerprint: None,
        })
    }

    /// 创建带 Basic 认证的客户端
    pub fn with_basic_auth(
        username: &str,
        password: &str,
    ) -> Result<Self, UploadError> {
        let token = base64::engine::general_purpose::STANDARD
            .encode(format!("{username}:{password}"));

        let auth_value = HeaderValue::from_str(&format!("Basic {}", token))
            .map_err(|e| UploadError::ClientBuild(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth_value);

        Ok(Self {
            client: _build_client(headers)?,
            token_fingerprint: Some(Arc::new(_fingerprint(&token))),
        })
    }

    /// 是否带认证
    pub fn is_authenticated(&self) -> bool {
        self.token_fingerprint.is_some()
    }
}

impl PartialEq for UploadClient {
    fn eq(&self, other: &Self) -> bool {
        self.token_fingerprint == other.token_fingerprint
    }
}

/// 防止debug泄漏账号
impl fmt::Debug for UploadClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadClient")
            .field("client", &"<Client with hidden authorization>")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

fn _fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn _build_client(headers: HeaderMap) -> Result<Client, UploadError> {
    Client::builder()
        .http1_only()
        .default_headers(headers)
        .build()
        .map_err(|e| UploadError::ClientBuild(e.to_string()))
}
