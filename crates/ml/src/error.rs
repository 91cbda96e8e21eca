use thiserror::Error;

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("controller expects {expected} inputs, got {actual}")]
    InputSize { expected: usize, actual: usize },
    #[error("controller produced no output")]
    EmptyOutput,
    #[error("controller produced a non-finite output")]
    NonFinite,
    #[error("layer shape mismatch: {0}")]
    Shape(String),
    #[error("{0}")]
    Failed(String),
    #[error("unsupported artifact version {0}")]
    UnsupportedVersion(u32),
    #[error("malformed controller artifact: {0}")]
    Artifact(#[from] serde_json::Error),
    #[error("artifact i/o failed: {0}")]
    Io(#[from] std::io::Error),
}
