//! API 模块常量定义

/// 所有 JSON 接口的路由前缀
pub const API_PREFIX: &str = "/api";

/// 请求 ID 响应头（同名请求头存在时原样回传）
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 请求体大小上限
pub const MAX_JSON_PAYLOAD: usize = 64 * 1024;
