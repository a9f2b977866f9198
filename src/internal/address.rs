//! 上传地址处理：用户输入的地址属于不可信输入，在任何传输开始之前校验。

pub mod chunked_response_query;
pub mod parse_http_uri;
