mod error;
mod factory;
mod loader;
mod merge;
mod settings;
mod table;

pub use error::CoefficientError;
pub use factory::{
    create_coefficient_model, create_constant_model, create_shared_coefficient_model,
    create_tabulated_model, read_tabulated_coefficients,
};
pub use loader::load_scalar_table;
pub use merge::{merge_axis_tables, MergedTable, ScalarTable};
pub use settings::{AxisTables, CoefficientSettings, SettingsKind};
pub use table::{CoefficientTable, TabulatedCoefficients};

use std::collections::BTreeMap;
use std::rc::Rc;

use nalgebra::Vector3;

/// Shared, read-only handle to a coefficient model.
///
/// The flight-condition consumer and the trim solver must observe the same
/// instance, so models are handed out reference-counted.
pub type SharedCoefficientModel = Rc<CoefficientModel>;

#[derive(Debug, Clone)]
enum Baseline {
    Constant(Vector3<f64>),
    Tabulated(TabulatedCoefficients),
}

/// Force or moment coefficient model: a 3-vector of coefficients as a
/// function of the declared independent variables, optionally carrying named
/// control-surface increment models on top of the baseline.
#[derive(Debug, Clone)]
pub struct CoefficientModel {
    baseline: Baseline,
    increments: BTreeMap<String, CoefficientModel>,
}

impl CoefficientModel {
    /// Model returning `coefficient` regardless of flight condition; its
    /// declared dimensionality is zero.
    pub fn constant(coefficient: Vector3<f64>) -> Self {
        Self {
            baseline: Baseline::Constant(coefficient),
            increments: BTreeMap::new(),
        }
    }

    pub fn tabulated(
        tables: TabulatedCoefficients,
        increments: BTreeMap<String, CoefficientModel>,
    ) -> Self {
        Self {
            baseline: Baseline::Tabulated(tables),
            increments,
        }
    }

    /// Number of independent variables an [`evaluate`](Self::evaluate) call
    /// must supply.
    pub fn dimensionality(&self) -> usize {
        match &self.baseline {
            Baseline::Constant(_) => 0,
            Baseline::Tabulated(tables) => tables.dimensionality(),
        }
    }

    pub fn increment_names(&self) -> impl Iterator<Item = &str> {
        self.increments.keys().map(String::as_str)
    }

    /// Baseline coefficients at the given independent-variable values.
    pub fn evaluate(&self, variables: &[f64]) -> Result<Vector3<f64>, CoefficientError> {
        match &self.baseline {
            Baseline::Constant(coefficient) => {
                if !variables.is_empty() {
                    return Err(CoefficientError::DimensionalityMismatch {
                        expected: 0,
                        found: variables.len(),
                    });
                }
                Ok(*coefficient)
            }
            Baseline::Tabulated(tables) => tables.value(variables),
        }
    }

    /// Coefficient increment contributed by the named control surface.
    pub fn increment(
        &self,
        name: &str,
        variables: &[f64],
    ) -> Result<Vector3<f64>, CoefficientError> {
        let model = self
            .increments
            .get(name)
            .ok_or_else(|| CoefficientError::UnknownControlSurface(name.to_string()))?;
        model.evaluate(variables)
    }

    /// Baseline coefficients plus the increments of every control surface
    /// listed in `surface_variables`, each evaluated at its own
    /// independent-variable values.
    pub fn evaluate_with_increments(
        &self,
        variables: &[f64],
        surface_variables: &BTreeMap<String, Vec<f64>>,
    ) -> Result<Vector3<f64>, CoefficientError> {
        let mut total = self.evaluate(variables)?;
        for (name, increment_variables) in surface_variables {
            total += self.increment(name, increment_variables)?;
        }
        Ok(total)
    }
}
