use thiserror::Error;

#[derive(Debug, Error)]
pub enum VarianceError {
    #[error("unknown variant type: {0:?}")]
    UnknownVariant(String),
    #[error("claim {index} has an empty required field: {field}")]
    InvalidClaim { index: usize, field: &'static str },
    #[error("expected at least {required} claims, got {found}")]
    InsufficientClaims { found: usize, required: usize },
    #[error("collaborator error: {0}")]
    Collaborator(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
