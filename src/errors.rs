use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum ChatcasterError {
    NotConnected(String),
    AuthFailed(String),
    Messenger(String),
    Validation(String),
    NotFound(String),
    FileOperation(String),
    Serialization(String),
    Config(String),
}

impl ChatcasterError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ChatcasterError::NotConnected(_) => "E001",
            ChatcasterError::AuthFailed(_) => "E002",
            ChatcasterError::Messenger(_) => "E003",
            ChatcasterError::Validation(_) => "E004",
            ChatcasterError::NotFound(_) => "E005",
            ChatcasterError::FileOperation(_) => "E006",
            ChatcasterError::Serialization(_) => "E007",
            ChatcasterError::Config(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ChatcasterError::NotConnected(_) => "Not Connected",
            ChatcasterError::AuthFailed(_) => "Authentication Failed",
            ChatcasterError::Messenger(_) => "Messenger Error",
            ChatcasterError::Validation(_) => "Validation Error",
            ChatcasterError::NotFound(_) => "Resource Not Found",
            ChatcasterError::FileOperation(_) => "File Operation Error",
            ChatcasterError::Serialization(_) => "Serialization Error",
            ChatcasterError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ChatcasterError::NotConnected(msg)
            | ChatcasterError::AuthFailed(msg)
            | ChatcasterError::Messenger(msg)
            | ChatcasterError::Validation(msg)
            | ChatcasterError::NotFound(msg)
            | ChatcasterError::FileOperation(msg)
            | ChatcasterError::Serialization(msg)
            | ChatcasterError::Config(msg) => msg,
        }
    }

    /// HTTP 状态码映射
    pub fn http_status(&self) -> StatusCode {
        match self {
            ChatcasterError::NotConnected(_) | ChatcasterError::AuthFailed(_) => {
                StatusCode::UNAUTHORIZED
            }
            ChatcasterError::Validation(_) => StatusCode::BAD_REQUEST,
            ChatcasterError::NotFound(_) => StatusCode::NOT_FOUND,
            ChatcasterError::Messenger(_) => StatusCode::BAD_GATEWAY,
            ChatcasterError::FileOperation(_)
            | ChatcasterError::Serialization(_)
            | ChatcasterError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
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

impl fmt::Display for ChatcasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ChatcasterError {}

// 便捷的构造函数
impl ChatcasterError {
    pub fn not_connected<T: Into<String>>(msg: T) -> Self {
        ChatcasterError::NotConnected(msg.into())
    }

    pub fn auth_failed<T: Into<String>>(msg: T) -> Self {
        ChatcasterError::AuthFailed(msg.into())
    }

    pub fn messenger<T: Into<String>>(msg: T) -> Self {
        ChatcasterError::Messenger(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ChatcasterError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ChatcasterError::NotFound(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        ChatcasterError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ChatcasterError::Serialization(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ChatcasterError::Config(msg.into())
    }
}

impl From<std::io::Error> for ChatcasterError {
    fn from(err: std::io::Error) -> Self {
        ChatcasterError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ChatcasterError {
    fn from(err: serde_json::Error) -> Self {
        ChatcasterError::Serialization(err.to_string())
    }
}

impl From<ureq::Error> for ChatcasterError {
    fn from(err: ureq::Error) -> Self {
        ChatcasterError::Messenger(err.to_string())
    }
}

impl From<config::ConfigError> for ChatcasterError {
    fn from(err: config::ConfigError) -> Self {
        ChatcasterError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChatcasterError>;
