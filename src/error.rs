use thiserror::Error;
use tracing::error;
use tracing_error::SpanTrace;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("config error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),
    #[error("store error: {0}")]
    StoreError(#[from] crate::model::StoreError),
}

impl AppError {
    /// sysexits(3) codes, so service managers can tell a bad config from a crash.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::IoError(_) => 74,     // EX_IOERR
            Self::ConfigError(_) => 78, // EX_CONFIG
            Self::StoreError(_) => 69,  // EX_UNAVAILABLE
        }
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;

pub async fn run_with_error_handler<F, T>(run: F) -> T
where
    F: AsyncFn() -> AppResult<T>,
    T: Send + Sync,
{
    match run().await {
        Ok(value) => value,
        Err(e) => {
            let code = e.exit_code();
            default_error_handler(e);
            std::process::exit(code);
        }
    }
}

fn default_error_handler(error: AppError) {
    let span = SpanTrace::capture();
    error!("{}\n{}", error, span);
}

pub fn log_error<E: std::error::Error + std::fmt::Display>(error: &E) {
    let span = SpanTrace::capture();
    error!("{}\n{}", error, span);
}
