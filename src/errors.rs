use actix_web::http::StatusCode;
use std::fmt;

#[derive(Debug, Clone)]
pub enum SnipbinError {
    Validation(String),
    Authorization(String),
    NotFound(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    PasswordHash(String),
    Sealing(String),
}

impl SnipbinError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            SnipbinError::Validation(_) => "E001",
            SnipbinError::Authorization(_) => "E002",
            SnipbinError::NotFound(_) => "E003",
            SnipbinError::DatabaseConfig(_) => "E004",
            SnipbinError::DatabaseConnection(_) => "E005",
            SnipbinError::DatabaseOperation(_) => "E006",
            SnipbinError::PasswordHash(_) => "E007",
            SnipbinError::Sealing(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            SnipbinError::Validation(_) => "Validation Error",
            SnipbinError::Authorization(_) => "Authorization Error",
            SnipbinError::NotFound(_) => "Resource Not Found",
            SnipbinError::DatabaseConfig(_) => "Database Configuration Error",
            SnipbinError::DatabaseConnection(_) => "Database Connection Error",
            SnipbinError::DatabaseOperation(_) => "Database Operation Error",
            SnipbinError::PasswordHash(_) => "Password Hash Error",
            SnipbinError::Sealing(_) => "Content Sealing Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            SnipbinError::Validation(msg)
            | SnipbinError::Authorization(msg)
            | SnipbinError::NotFound(msg)
            | SnipbinError::DatabaseConfig(msg)
            | SnipbinError::DatabaseConnection(msg)
            | SnipbinError::DatabaseOperation(msg)
            | SnipbinError::PasswordHash(msg)
            | SnipbinError::Sealing(msg) => msg,
        }
    }

    /// HTTP 状态码映射
    pub fn http_status(&self) -> StatusCode {
        match self {
            SnipbinError::Validation(_) => StatusCode::BAD_REQUEST,
            SnipbinError::Authorization(_) => StatusCode::UNAUTHORIZED,
            SnipbinError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SnipbinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SnipbinError {}

// 便捷的构造函数
impl SnipbinError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        SnipbinError::Validation(msg.into())
    }

    pub fn authorization<T: Into<String>>(msg: T) -> Self {
        SnipbinError::Authorization(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        SnipbinError::NotFound(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        SnipbinError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        SnipbinError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        SnipbinError::DatabaseOperation(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        SnipbinError::PasswordHash(msg.into())
    }

    pub fn sealing<T: Into<String>>(msg: T) -> Self {
        SnipbinError::Sealing(msg.into())
    }
}

impl From<sea_orm::DbErr> for SnipbinError {
    fn from(err: sea_orm::DbErr) -> Self {
        SnipbinError::DatabaseOperation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SnipbinError>;
