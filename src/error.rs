#[derive(Debug, thiserror::Error)]
pub enum PriceDataError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid granularity: {0}")]
    InvalidGranularity(String),

    #[error("Lookup error: {0}")]
    Lookup(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PriceDataError {
    /// Whether the error was caused by bad caller input.
    ///
    /// Validation errors are fixable by the caller and never retried.
    /// Everything else (lookup, persistence, IO) is reported as internal.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PriceDataError::InvalidGranularity(_) | PriceDataError::InvalidArgument(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PriceDataError>;
