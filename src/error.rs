use thiserror::Error;

#[derive(Error, Debug)]
pub enum RureqError {
    #[error("解析错误: {0}")]
    ParseError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("未知的环境: {0}")]
    UnknownEnvironment(String),

    #[error("未找到集合: {0}")]
    CollectionNotFound(String),

    #[error("未找到请求: {0}")]
    RequestNotFound(String),

    #[error("HTTP 客户端错误: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON 解析错误: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML 解析错误: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for RureqError {
    fn from(err: anyhow::Error) -> Self {
        RureqError::Other(err.to_string())
    }
}

/// Result type for rureq crate
pub type Result<T> = std::result::Result<T, RureqError>;
