use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MlError {
    #[error("parameter shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },
}
