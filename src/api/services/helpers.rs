//! API 帮助函数

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, error, web};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::api::constants::MAX_JSON_PAYLOAD;
use crate::errors::RosterError;
use crate::storage::{TaskType, TimeSlot};

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 201 Created
pub fn created_response<T: Serialize>(message: impl Into<String>, data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, ErrorCode::Success, message, Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 RosterError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_roster(err: &RosterError) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        warn!("API error: {}", err);
    }
    let error_code = ErrorCode::from(err.clone());
    error_response(status, error_code, err.message())
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 RosterError。
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<RosterError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_roster(&e.into()),
    }
}

/// 解析 `YYYY-MM-DD`
pub fn parse_date(value: &str) -> Result<NaiveDate, RosterError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        RosterError::date_parse(format!(
            "Invalid date '{}': {}. Expected YYYY-MM-DD",
            value, e
        ))
    })
}

/// 日期缺失或格式错误时回退到今天
pub fn date_or_today(value: Option<&str>) -> NaiveDate {
    value
        .and_then(|v| parse_date(v).ok())
        .unwrap_or_else(|| chrono::Local::now().date_naive())
}

pub fn parse_task_type(value: &str) -> Result<TaskType, RosterError> {
    value.parse()
}

/// 空字符串视为未提供
pub fn parse_time_slot(value: Option<&str>) -> Result<Option<TimeSlot>, RosterError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::parse)
        .transpose()
}

fn bad_request(detail: String, kind: &str) -> error::Error {
    let message = format!("Invalid {}: {}", kind, detail);
    let response = error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message);
    error::InternalError::from_response(message, response).into()
}

/// JSON 请求体解析失败时返回统一信封
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_JSON_PAYLOAD)
        .error_handler(|err, _req: &HttpRequest| bad_request(err.to_string(), "JSON body"))
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req: &HttpRequest| bad_request(err.to_string(), "query string"))
}

/// 路径参数（如 `/workers/{id}`）解析失败
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req: &HttpRequest| bad_request(err.to_string(), "path parameter"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-01-31").unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
        );
        assert!(matches!(
            parse_date("31/01/2025"),
            Err(RosterError::DateParse(_))
        ));
    }

    #[test]
    fn test_date_or_today_falls_back() {
        let today = chrono::Local::now().date_naive();
        assert_eq!(date_or_today(None), today);
        assert_eq!(date_or_today(Some("not-a-date")), today);
        assert_eq!(
            date_or_today(Some("2024-02-29")),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_parse_time_slot_blank_is_none() {
        assert_eq!(parse_time_slot(None).unwrap(), None);
        assert_eq!(parse_time_slot(Some("")).unwrap(), None);
        assert_eq!(
            parse_time_slot(Some("05:00-07:00")).unwrap(),
            Some(TimeSlot::H05)
        );
        assert!(matches!(
            parse_time_slot(Some("05:00")),
            Err(RosterError::InvalidTimeSlot(_))
        ));
    }
}
