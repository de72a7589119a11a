use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("api error: {0}")]
    Api(#[from] store::ApiError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
