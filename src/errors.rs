use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

#[derive(Debug, Clone)]
pub enum LinkpingError {
    InvalidRequest(String),
    NotFound(String),
    Forbidden(String),
    Config(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    ProbeFailed(String),
    FileOperation(String),
    Serialization(String),
}

/// Error body returned at the HTTP boundary
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LinkpingError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinkpingError::InvalidRequest(_) => "E001",
            LinkpingError::NotFound(_) => "E002",
            LinkpingError::Forbidden(_) => "E003",
            LinkpingError::Config(_) => "E004",
            LinkpingError::DatabaseConfig(_) => "E005",
            LinkpingError::DatabaseConnection(_) => "E006",
            LinkpingError::DatabaseOperation(_) => "E007",
            LinkpingError::ProbeFailed(_) => "E008",
            LinkpingError::FileOperation(_) => "E009",
            LinkpingError::Serialization(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinkpingError::InvalidRequest(_) => "Invalid Request",
            LinkpingError::NotFound(_) => "Resource Not Found",
            LinkpingError::Forbidden(_) => "Forbidden",
            LinkpingError::Config(_) => "Configuration Error",
            LinkpingError::DatabaseConfig(_) => "Database Configuration Error",
            LinkpingError::DatabaseConnection(_) => "Database Connection Error",
            LinkpingError::DatabaseOperation(_) => "Database Operation Error",
            LinkpingError::ProbeFailed(_) => "Probe Failed",
            LinkpingError::FileOperation(_) => "File Operation Error",
            LinkpingError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinkpingError::InvalidRequest(msg)
            | LinkpingError::NotFound(msg)
            | LinkpingError::Forbidden(msg)
            | LinkpingError::Config(msg)
            | LinkpingError::DatabaseConfig(msg)
            | LinkpingError::DatabaseConnection(msg)
            | LinkpingError::DatabaseOperation(msg)
            | LinkpingError::ProbeFailed(msg)
            | LinkpingError::FileOperation(msg)
            | LinkpingError::Serialization(msg) => msg,
        }
    }

    /// Caller errors keep their own status; everything else is an internal error.
    pub fn http_status(&self) -> StatusCode {
        match self {
            LinkpingError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            LinkpingError::NotFound(_) => StatusCode::NOT_FOUND,
            LinkpingError::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_internal(&self) -> bool {
        self.http_status() == StatusCode::INTERNAL_SERVER_ERROR
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// Body sent to HTTP callers. Internal failures get a generic message
    /// with the detail under `error`.
    pub fn to_body(&self) -> ErrorBody {
        match self {
            LinkpingError::InvalidRequest(msg)
            | LinkpingError::NotFound(msg)
            | LinkpingError::Forbidden(msg) => ErrorBody {
                message: msg.clone(),
                error: None,
            },
            LinkpingError::ProbeFailed(msg) => ErrorBody {
                message: "Ping failed".to_string(),
                error: Some(msg.clone()),
            },
            other => ErrorBody {
                message: "Server Error".to_string(),
                error: Some(other.message().to_string()),
            },
        }
    }
}

impl fmt::Display for LinkpingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkpingError {}

impl ResponseError for LinkpingError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.http_status())
            .insert_header(("Content-Type", "application/json; charset=utf-8"))
            .json(self.to_body())
    }
}

// 便捷的构造函数
impl LinkpingError {
    pub fn invalid_request<T: Into<String>>(msg: T) -> Self {
        LinkpingError::InvalidRequest(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkpingError::NotFound(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        LinkpingError::Forbidden(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        LinkpingError::Config(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        LinkpingError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        LinkpingError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LinkpingError::DatabaseOperation(msg.into())
    }

    pub fn probe_failed<T: Into<String>>(msg: T) -> Self {
        LinkpingError::ProbeFailed(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LinkpingError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LinkpingError::Serialization(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for LinkpingError {
    fn from(err: sea_orm::DbErr) -> Self {
        LinkpingError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for LinkpingError {
    fn from(err: std::io::Error) -> Self {
        LinkpingError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LinkpingError {
    fn from(err: serde_json::Error) -> Self {
        LinkpingError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkpingError>;
