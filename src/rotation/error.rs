use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrientationError {
    #[error("orientation closure is not ready: no angle source has been registered")]
    ClosureNotReady,

    #[error("unsupported operation: {operation}")]
    UnsupportedOperation { operation: &'static str },
}
