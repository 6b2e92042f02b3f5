use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum RosterError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Validation(String),
    WorkerNotFound(String),
    AssignmentNotFound(String),
    AssignmentConflict(String),
    InvalidTaskType(String),
    InvalidTimeSlot(String),
    FileOperation(String),
    Serialization(String),
    DateParse(String),
}

impl RosterError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            RosterError::DatabaseConfig(_) => "E001",
            RosterError::DatabaseConnection(_) => "E002",
            RosterError::DatabaseOperation(_) => "E003",
            RosterError::Validation(_) => "E004",
            RosterError::WorkerNotFound(_) => "E005",
            RosterError::AssignmentNotFound(_) => "E006",
            RosterError::AssignmentConflict(_) => "E007",
            RosterError::InvalidTaskType(_) => "E008",
            RosterError::InvalidTimeSlot(_) => "E009",
            RosterError::FileOperation(_) => "E010",
            RosterError::Serialization(_) => "E011",
            RosterError::DateParse(_) => "E012",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            RosterError::DatabaseConfig(_) => "Database Configuration Error",
            RosterError::DatabaseConnection(_) => "Database Connection Error",
            RosterError::DatabaseOperation(_) => "Database Operation Error",
            RosterError::Validation(_) => "Validation Error",
            RosterError::WorkerNotFound(_) => "Worker Not Found",
            RosterError::AssignmentNotFound(_) => "Assignment Not Found",
            RosterError::AssignmentConflict(_) => "Assignment Conflict",
            RosterError::InvalidTaskType(_) => "Invalid Task Type",
            RosterError::InvalidTimeSlot(_) => "Invalid Time Slot",
            RosterError::FileOperation(_) => "File Operation Error",
            RosterError::Serialization(_) => "Serialization Error",
            RosterError::DateParse(_) => "Date Parse Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            RosterError::DatabaseConfig(msg)
            | RosterError::DatabaseConnection(msg)
            | RosterError::DatabaseOperation(msg)
            | RosterError::Validation(msg)
            | RosterError::WorkerNotFound(msg)
            | RosterError::AssignmentNotFound(msg)
            | RosterError::AssignmentConflict(msg)
            | RosterError::InvalidTaskType(msg)
            | RosterError::InvalidTimeSlot(msg)
            | RosterError::FileOperation(msg)
            | RosterError::Serialization(msg)
            | RosterError::DateParse(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            RosterError::Validation(_)
            | RosterError::InvalidTaskType(_)
            | RosterError::InvalidTimeSlot(_)
            | RosterError::DateParse(_)
            | RosterError::Serialization(_) => StatusCode::BAD_REQUEST,
            RosterError::WorkerNotFound(_) | RosterError::AssignmentNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            RosterError::AssignmentConflict(_) => StatusCode::CONFLICT,
            RosterError::DatabaseConnection(_) => StatusCode::SERVICE_UNAVAILABLE,
            RosterError::DatabaseConfig(_)
            | RosterError::DatabaseOperation(_)
            | RosterError::FileOperation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for RosterError {}

// 便捷的构造函数
impl RosterError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        RosterError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        RosterError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        RosterError::DatabaseOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        RosterError::Validation(msg.into())
    }

    pub fn worker_not_found(worker_id: i32) -> Self {
        RosterError::WorkerNotFound(format!("worker_not_found: {}", worker_id))
    }

    pub fn assignment_not_found(assignment_id: i32) -> Self {
        RosterError::AssignmentNotFound(format!("assignment_not_found: {}", assignment_id))
    }

    pub fn assignment_conflict<T: Into<String>>(msg: T) -> Self {
        RosterError::AssignmentConflict(msg.into())
    }

    pub fn invalid_task_type<T: Into<String>>(msg: T) -> Self {
        RosterError::InvalidTaskType(msg.into())
    }

    pub fn invalid_time_slot<T: Into<String>>(msg: T) -> Self {
        RosterError::InvalidTimeSlot(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        RosterError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        RosterError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        RosterError::DateParse(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for RosterError {
    fn from(err: sea_orm::DbErr) -> Self {
        RosterError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for RosterError {
    fn from(err: std::io::Error) -> Self {
        RosterError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for RosterError {
    fn from(err: serde_json::Error) -> Self {
        RosterError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for RosterError {
    fn from(err: chrono::ParseError) -> Self {
        RosterError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = RosterError::worker_not_found(7);
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "E005");
        assert!(err.message().contains("worker_not_found"));
    }

    #[test]
    fn test_validation_maps_to_400() {
        let err = RosterError::validation("name must not be empty");
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.format_simple(),
            "Validation Error: name must not be empty"
        );
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let err = RosterError::assignment_conflict("duplicate");
        assert_eq!(err.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_db_err_conversion() {
        let err: RosterError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, RosterError::DatabaseOperation(_)));
        assert!(err.to_string().contains("boom"));
    }
}
