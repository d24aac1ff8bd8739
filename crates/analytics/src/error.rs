use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid engine parameters: {0}")]
    InvalidParameters(String),

    #[error("An unexpected error occurred during analytics calculation: {0}")]
    InternalError(String),
}
