use super::settings::SettingsKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoefficientError {
    #[error("inconsistent independent variables between component tables: {detail}")]
    InconsistentIndependentVariables { detail: String },

    #[error("unsupported dimensionality: {found} independent variables, supported range is 1 to 6")]
    UnsupportedDimensionality { found: usize },

    #[error("coefficient settings type mismatch: expected {expected}, got {actual}")]
    SettingsTypeMismatch {
        expected: SettingsKind,
        actual: SettingsKind,
    },

    #[error("dimensionality mismatch: model declares {expected} independent variables, {found} supplied")]
    DimensionalityMismatch { expected: usize, found: usize },

    #[error("no control surface increment model named '{0}'")]
    UnknownControlSurface(String),

    #[error("failed to read coefficient table file: {0}")]
    TableFile(#[from] std::io::Error),

    #[error("failed to parse coefficient table file: {0}")]
    TableFormat(#[from] serde_yaml::Error),

    #[error("malformed coefficient table: {0}")]
    MalformedTable(String),
}
