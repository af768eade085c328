use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("action index {0} is out of range")]
    InvalidAction(usize),
    #[error("invalid table configuration: {0}")]
    InvalidConfig(String),
}
