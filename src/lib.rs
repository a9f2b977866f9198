/// 内部实现的模块
mod internal;


/// 上传地址：解析不可信输入、切换 chunked 响应查询串
pub mod address {
    use crate::internal;
    pub use internal::address::chunked_response_query::*;
    pub use internal::address::parse_http_uri::*;
}

pub mod client {
    use crate::internal;
    pub use internal::client::structs::upload_client::UploadClient;
}

pub mod states {
    pub mod unlock_reactive {
        use crate::internal;
        pub use internal::states::unlock_reactive::*;
    }
}

pub mod upload {
    use crate::internal;
    // 类型与入口统一从这里导出
    pub use internal::upload::structs::*;
    pub use internal::upload::structs::progress_fields::UNKNOWN_TOTAL;
    pub use internal::upload::structs::slow_body_stream::{
        DEFAULT_SLOW_CHUNK_DELAY_MS, DEFAULT_SLOW_CHUNK_SIZE, DEFAULT_STREAM_LENGTH,
    };
    pub use internal::upload::traits::upload::{HookAbort, UploadHook};
}
