use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewUrlError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Schema error: {message}")]
    Schema { message: String },
    #[error("Io error: {0}")]
    Io(String),
    #[error("Json error: {0}")]
    Json(String),
}

impl ViewUrlError {
    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::Schema { message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, ViewUrlError>;

// Helper conversions
impl From<config::ConfigError> for ViewUrlError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<serde_json::Error> for ViewUrlError {
    fn from(e: serde_json::Error) -> Self { Self::Json(e.to_string()) }
}
impl From<std::io::Error> for ViewUrlError {
    fn from(e: std::io::Error) -> Self { Self::Io(e.to_string()) }
}
