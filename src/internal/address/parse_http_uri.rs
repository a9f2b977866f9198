use url::Url;

use crate::internal::upload::structs::upload_error::UploadError;

/// 把用户输入解析为绝对的 http/https 地址。
///
/// - 首尾空白会被忽略
/// - 相对路径、缺少主机、非 http(s) 协议一律视为非法输入
///
/// example:
/// ```
/// use post_progress::address::parse_http_uri;
///
/// let url = parse_http_uri(" http://localhost:8080/upload ").unwrap();
/// assert_eq!(url.path(), "/upload");
/// assert!(parse_http_uri("ftp://localhost/").is_err());
/// ```
pub fn parse_http_uri(text: &str) -> Result<Url, UploadError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(UploadError::InvalidInput("地址为空".to_string()));
    }

    let url = Url::parse(text)
        .map_err(|e| UploadError::InvalidInput(format!("{text}: {e}")))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UploadError::InvalidInput(format!(
            "{text}: 仅支持 http/https"
        )));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UploadError::InvalidInput(format!("{text}: 缺少主机")));
    }

    Ok(url)
}
