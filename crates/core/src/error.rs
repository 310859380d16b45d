#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown metric kind: {0}")]
    UnknownMetric(String),

    #[error("Unknown warning status: {0}")]
    UnknownStatus(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}
