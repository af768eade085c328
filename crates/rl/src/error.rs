use thiserror::Error;

use crate::session::Mode;

#[derive(Debug, Error)]
pub enum RlError {
    /// The session is in a mode that forbids the request.
    #[error("not allowed while {mode}")]
    Busy { mode: Mode },
    #[error("no saved model under key `{key}`")]
    NoModel { key: String },
    #[error("saved model does not fit this network: {0}")]
    IncompatibleModel(#[from] ml::MlError),
    #[error("unsupported model format version {0}")]
    UnsupportedVersion(u32),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Physics(#[from] physics::PhysicsError),
    #[error("failed to {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },
    #[error("model serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
