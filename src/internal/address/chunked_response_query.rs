use url::Url;

/// 请求服务端以 chunked 方式返回响应体时使用的查询串。
pub const CHUNKED_RESPONSE_QUERY: &str = "chunkedResponse=1";

/// 替换地址的查询串：开启时为 `chunkedResponse=1`，关闭时清空查询串。
///
/// 原有的其它查询参数会被整体替换掉。
pub fn set_chunked_response_query(url: &mut Url, chunked_response: bool) {
    if chunked_response {
        url.set_query(Some(CHUNKED_RESPONSE_QUERY));
    } else {
        url.set_query(None);
    }
}

/// 地址当前是否带有 chunked 响应请求。
pub fn wants_chunked_response(url: &Url) -> bool {
    url.query() == Some(CHUNKED_RESPONSE_QUERY)
}
