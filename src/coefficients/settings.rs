use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

use super::error::CoefficientError;
use super::merge::ScalarTable;

/// Discriminant of a [`CoefficientSettings`] variant, used in error
/// reporting when a specific variant is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsKind {
    Constant,
    Tabulated,
}

impl fmt::Display for SettingsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant => write!(f, "constant"),
            Self::Tabulated => write!(f, "tabulated"),
        }
    }
}

/// Per-axis table sources for a tabulated coefficient set: the x-, y- and
/// z-component tables, either as file paths resolved once at construction or
/// as in-memory tables handed over by an external reader.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisTables {
    Files([PathBuf; 3]),
    Inline(Box<[ScalarTable; 3]>),
}

/// Tagged descriptor of a coefficient model, the unit of configuration the
/// factory consumes. The tag closes the variant set: dispatch is by match,
/// and deserialization can only ever produce a known variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoefficientSettings {
    Constant {
        coefficient: [f64; 3],
    },
    Tabulated {
        axis_tables: AxisTables,
        #[serde(default)]
        control_surfaces: BTreeMap<String, CoefficientSettings>,
    },
}

impl CoefficientSettings {
    pub fn kind(&self) -> SettingsKind {
        match self {
            Self::Constant { .. } => SettingsKind::Constant,
            Self::Tabulated { .. } => SettingsKind::Tabulated,
        }
    }

    /// The constant payload, failing when the descriptor declares another
    /// variant.
    pub fn as_constant(&self) -> Result<[f64; 3], CoefficientError> {
        match self {
            Self::Constant { coefficient } => Ok(*coefficient),
            other => Err(CoefficientError::SettingsTypeMismatch {
                expected: SettingsKind::Constant,
                actual: other.kind(),
            }),
        }
    }

    /// The tabulated payload, failing when the descriptor declares another
    /// variant.
    pub fn as_tabulated(
        &self,
    ) -> Result<(&AxisTables, &BTreeMap<String, CoefficientSettings>), CoefficientError> {
        match self {
            Self::Tabulated {
                axis_tables,
                control_surfaces,
            } => Ok((axis_tables, control_surfaces)),
            other => Err(CoefficientError::SettingsTypeMismatch {
                expected: SettingsKind::Tabulated,
                actual: other.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_constant() {
        let yaml = "type: constant\ncoefficient: [0.5, 0.0, 0.02]\n";
        let settings: CoefficientSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.kind(), SettingsKind::Constant);
        assert_eq!(settings.as_constant().unwrap(), [0.5, 0.0, 0.02]);
    }

    #[test]
    fn test_deserialize_tabulated_with_inline_tables() {
        let yaml = r#"
type: tabulated
axis_tables:
  inline:
    - breakpoints: [[0.0, 1.0]]
      values: [0.0, 1.0]
    - breakpoints: [[0.0, 1.0]]
      values: [0.0, 2.0]
    - breakpoints: [[0.0, 1.0]]
      values: [0.0, 3.0]
control_surfaces: {}
"#;
        let settings: CoefficientSettings = serde_yaml::from_str(yaml).unwrap();
        let (axis_tables, control_surfaces) = settings.as_tabulated().unwrap();
        assert!(control_surfaces.is_empty());
        match axis_tables {
            AxisTables::Inline(tables) => assert_eq!(tables[1].values, vec![0.0, 2.0]),
            AxisTables::Files(_) => panic!("expected inline tables"),
        }
    }

    #[test]
    fn test_variant_mismatch_names_both_kinds() {
        let settings = CoefficientSettings::Constant {
            coefficient: [0.0; 3],
        };
        match settings.as_tabulated().unwrap_err() {
            CoefficientError::SettingsTypeMismatch { expected, actual } => {
                assert_eq!(expected, SettingsKind::Tabulated);
                assert_eq!(actual, SettingsKind::Constant);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
