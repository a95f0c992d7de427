use crate::coefficients::CoefficientError;
use crate::rotation::OrientationError;
use crate::trim::TrimError;
use thiserror::Error;

/// Crate-wide error type.
///
/// Closures wired between models (angle sources, guidance hooks) carry this
/// type so that failures from any subsystem propagate through a single seam.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Orientation error: {0}")]
    Orientation(#[from] OrientationError),

    #[error("Coefficient error: {0}")]
    Coefficient(#[from] CoefficientError),

    #[error("Trim error: {0}")]
    Trim(#[from] TrimError),
}
