use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Market data unavailable: {0}")]
    DataUnavailable(String),

    #[error("News source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Insufficient history: {0}")]
    InsufficientHistory(String),

    #[error("Invalid ticker: {0}")]
    InvalidTicker(String),

    #[error("API error: {0}")]
    ApiError(String),
}
