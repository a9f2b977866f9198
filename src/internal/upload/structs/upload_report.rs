use reqwest::StatusCode;

/// 一次成功上传的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    /// 响应状态码（一定是 2xx）
    pub status: StatusCode,
    /// 请求体实际发出的字节数
    pub bytes_sent: u64,
    /// 响应体实际收到的字节数
    pub bytes_received: u64,
}
