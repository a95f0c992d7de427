use std::cell::RefCell;
use std::collections::BTreeMap;

use nalgebra::Vector3;

use crate::coefficients::SharedCoefficientModel;
use crate::utils::errors::SimError;

/// Sideslip and bank angles supplied by external guidance, in radians.
pub type SideslipBankFn = Box<dyn Fn(f64) -> (f64, f64)>;

/// Per-step flight-condition state shared between the coefficient consumer
/// and the trim solver.
///
/// The driving simulation loop updates the independent variables once per
/// step from its trajectory state, then queries orientation and coefficient
/// models any number of times within that step. Query times must be
/// monotonically non-decreasing; repeats within a step are expected and
/// cheap. A rejected step that re-queries an already-seen time with changed
/// variables must call `reset_current_time` on the dependent models first.
pub struct FlightConditions {
    coefficients: SharedCoefficientModel,
    independent_variables: RefCell<Vec<f64>>,
    control_surface_variables: RefCell<BTreeMap<String, Vec<f64>>>,
    sideslip_and_bank: SideslipBankFn,
}

impl FlightConditions {
    /// Starts with all independent variables at zero and zero
    /// sideslip/bank.
    pub fn new(coefficients: SharedCoefficientModel) -> Self {
        let dimensionality = coefficients.dimensionality();
        Self {
            coefficients,
            independent_variables: RefCell::new(vec![0.0; dimensionality]),
            control_surface_variables: RefCell::new(BTreeMap::new()),
            sideslip_and_bank: Box::new(|_| (0.0, 0.0)),
        }
    }

    pub fn with_sideslip_and_bank(mut self, sideslip_and_bank: SideslipBankFn) -> Self {
        self.sideslip_and_bank = sideslip_and_bank;
        self
    }

    pub fn coefficients(&self) -> &SharedCoefficientModel {
        &self.coefficients
    }

    /// Replaces the current independent-variable values for this step.
    pub fn set_independent_variables(&self, variables: Vec<f64>) -> Result<(), SimError> {
        let expected = self.coefficients.dimensionality();
        if variables.len() != expected {
            return Err(crate::coefficients::CoefficientError::DimensionalityMismatch {
                expected,
                found: variables.len(),
            }
            .into());
        }
        *self.independent_variables.borrow_mut() = variables;
        Ok(())
    }

    pub fn independent_variables(&self) -> Vec<f64> {
        self.independent_variables.borrow().clone()
    }

    pub fn set_control_surface_variables(&self, name: &str, variables: Vec<f64>) {
        self.control_surface_variables
            .borrow_mut()
            .insert(name.to_string(), variables);
    }

    pub fn sideslip_and_bank(&self, seconds: f64) -> (f64, f64) {
        (self.sideslip_and_bank)(seconds)
    }

    /// Total coefficients at the current flight condition: baseline plus the
    /// increments of every control surface with registered variables.
    pub fn current_coefficients(&self) -> Result<Vector3<f64>, SimError> {
        let variables = self.independent_variables.borrow();
        let surface_variables = self.control_surface_variables.borrow();
        Ok(self
            .coefficients
            .evaluate_with_increments(&variables, &surface_variables)?)
    }
}
