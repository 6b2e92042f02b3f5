//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};
use ts_rs::TS;

use crate::errors::RosterError;
use crate::storage::models::TS_EXPORT_PATH;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，ts-rs 自动生成 TypeScript 类型。
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 3000-3099: Worker 错误
/// - 3100-3199: 排班错误
/// - 3200-3299: 任务/时段参数错误
/// - 5000-5099: 数据库错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[ts(rename = "ErrorCode")]
#[ts(repr(enum))]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    NotFound = 1004,
    InternalServerError = 1005,
    InvalidDateFormat = 1012,
    ServiceUnavailable = 1030,

    // Worker 错误 3000-3099
    WorkerNotFound = 3000,
    WorkerInvalid = 3001,

    // 排班错误 3100-3199
    AssignmentNotFound = 3100,
    AssignmentConflict = 3101,

    // 参数错误 3200-3299
    InvalidTaskType = 3200,
    InvalidTimeSlot = 3201,

    // 数据库错误 5000-5099
    DatabaseError = 5000,
}

impl From<RosterError> for ErrorCode {
    fn from(err: RosterError) -> Self {
        match err {
            RosterError::Validation(_) => ErrorCode::WorkerInvalid,
            RosterError::WorkerNotFound(_) => ErrorCode::WorkerNotFound,
            RosterError::AssignmentNotFound(_) => ErrorCode::AssignmentNotFound,
            RosterError::AssignmentConflict(_) => ErrorCode::AssignmentConflict,
            RosterError::InvalidTaskType(_) => ErrorCode::InvalidTaskType,
            RosterError::InvalidTimeSlot(_) => ErrorCode::InvalidTimeSlot,
            RosterError::DateParse(_) => ErrorCode::InvalidDateFormat,
            RosterError::Serialization(_) => ErrorCode::BadRequest,
            RosterError::DatabaseConnection(_) => ErrorCode::ServiceUnavailable,
            RosterError::DatabaseConfig(_) | RosterError::DatabaseOperation(_) => {
                ErrorCode::DatabaseError
            }
            RosterError::FileOperation(_) => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::Success).unwrap(), "0");
        assert_eq!(
            serde_json::to_string(&ErrorCode::WorkerNotFound).unwrap(),
            "3000"
        );
        let back: ErrorCode = serde_json::from_str("3201").unwrap();
        assert_eq!(back, ErrorCode::InvalidTimeSlot);
    }

    #[test]
    fn test_from_roster_error() {
        assert_eq!(
            ErrorCode::from(RosterError::worker_not_found(1)),
            ErrorCode::WorkerNotFound
        );
        assert_eq!(
            ErrorCode::from(RosterError::invalid_task_type("laundry")),
            ErrorCode::InvalidTaskType
        );
        assert_eq!(
            ErrorCode::from(RosterError::database_operation("boom")),
            ErrorCode::DatabaseError
        );
    }
}
