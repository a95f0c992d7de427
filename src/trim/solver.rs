use std::cell::RefCell;
use std::rc::Rc;

use argmin::core::{CostFunction, Error, Executor, State};
use argmin::solver::brent::BrentRoot;
use thiserror::Error as ThisError;

use crate::coefficients::SharedCoefficientModel;
use crate::flight::FlightConditions;
use crate::rotation::{AeroAngleRotationalModel, AerodynamicAngles};
use crate::utils::errors::SimError;

/// Index of the pitching-moment component in a moment-coefficient 3-vector.
const PITCH_COMPONENT: usize = 1;

#[derive(ThisError, Debug)]
pub enum TrimError {
    #[error("no trim angle of attack found in [{lower}, {upper}]: {reason}")]
    TrimNotFound {
        lower: f64,
        upper: f64,
        reason: String,
    },

    #[error("invalid trim solver configuration: {0}")]
    InvalidConfiguration(String),
}

#[derive(Debug, Clone)]
pub struct TrimSolverConfig {
    /// Angle-of-attack bracket searched for the root, in radians.
    pub bracket: (f64, f64),
    /// Root tolerance on the angle of attack.
    pub tolerance: f64,
    pub max_iterations: u64,
    /// 0 = silent, 1 = print each solved trim point.
    pub debug_level: usize,
}

impl Default for TrimSolverConfig {
    fn default() -> Self {
        Self {
            bracket: (-0.5, 0.5),
            tolerance: 1e-10,
            max_iterations: 100,
            debug_level: 0,
        }
    }
}

// Root-finding problem handed to argmin: the pitching-moment coefficient as
// a function of the angle of attack, all other independent variables frozen.
struct PitchingMomentResidual {
    coefficients: SharedCoefficientModel,
    variables: Vec<f64>,
    angle_of_attack_index: usize,
}

impl PitchingMomentResidual {
    fn evaluate_at(&self, angle_of_attack: f64) -> Result<f64, SimError> {
        let mut variables = self.variables.clone();
        variables[self.angle_of_attack_index] = angle_of_attack;
        let moment = self.coefficients.evaluate(&variables)?;
        Ok(moment[PITCH_COMPONENT])
    }
}

impl CostFunction for PitchingMomentResidual {
    type Param = f64;
    type Output = f64;

    fn cost(&self, angle_of_attack: &f64) -> Result<f64, Error> {
        self.evaluate_at(*angle_of_attack).map_err(Error::from)
    }
}

/// Finds the angle of attack zeroing the pitching-moment coefficient of a
/// shared moment-coefficient model.
///
/// The solve is single-pass: it uses whatever independent-variable values
/// the flight condition currently holds (i.e. the previous step's values)
/// and is not iterated to a fixed point within one query. Solutions are
/// cached per queried time; [`Self::reset_current_time`] invalidates the
/// cache when upstream inputs change at an unchanged time value.
#[derive(Debug)]
pub struct TrimSolver {
    coefficients: SharedCoefficientModel,
    angle_of_attack_index: usize,
    config: TrimSolverConfig,
    cache: RefCell<Option<(f64, f64)>>,
}

impl TrimSolver {
    pub fn new(
        coefficients: SharedCoefficientModel,
        angle_of_attack_index: usize,
        config: TrimSolverConfig,
    ) -> Result<Self, TrimError> {
        if angle_of_attack_index >= coefficients.dimensionality() {
            return Err(TrimError::InvalidConfiguration(format!(
                "angle-of-attack variable index {} out of range for a model with {} independent variables",
                angle_of_attack_index,
                coefficients.dimensionality()
            )));
        }
        if config.bracket.0 >= config.bracket.1 {
            return Err(TrimError::InvalidConfiguration(format!(
                "empty bracket [{}, {}]",
                config.bracket.0, config.bracket.1
            )));
        }
        if config.max_iterations == 0 {
            return Err(TrimError::InvalidConfiguration(
                "maximum iteration count must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            coefficients,
            angle_of_attack_index,
            config,
            cache: RefCell::new(None),
        })
    }

    /// Solves for the trim angle of attack with the remaining independent
    /// variables frozen at `untrimmed_variables`. The value at the
    /// angle-of-attack slot of the input is ignored.
    pub fn find_trim_angle(&self, untrimmed_variables: &[f64]) -> Result<f64, SimError> {
        if untrimmed_variables.len() != self.coefficients.dimensionality() {
            return Err(crate::coefficients::CoefficientError::DimensionalityMismatch {
                expected: self.coefficients.dimensionality(),
                found: untrimmed_variables.len(),
            }
            .into());
        }
        let residual = PitchingMomentResidual {
            coefficients: Rc::clone(&self.coefficients),
            variables: untrimmed_variables.to_vec(),
            angle_of_attack_index: self.angle_of_attack_index,
        };

        let (lower, upper) = self.config.bracket;
        let moment_at_lower = residual.evaluate_at(lower)?;
        let moment_at_upper = residual.evaluate_at(upper)?;
        if moment_at_lower * moment_at_upper > 0.0 {
            return Err(TrimError::TrimNotFound {
                lower,
                upper,
                reason: format!(
                    "no sign change: Cm({lower}) = {moment_at_lower}, Cm({upper}) = {moment_at_upper}"
                ),
            }
            .into());
        }

        let solver = BrentRoot::new(lower, upper, self.config.tolerance);
        let result = Executor::new(residual, solver)
            .configure(|state| state.max_iters(self.config.max_iterations))
            .run()
            .map_err(|err| TrimError::TrimNotFound {
                lower,
                upper,
                reason: err.to_string(),
            })?;

        let angle_of_attack = result
            .state()
            .get_best_param()
            .copied()
            .ok_or_else(|| TrimError::TrimNotFound {
                lower,
                upper,
                reason: "solver terminated without a best parameter".to_string(),
            })?;

        if self.config.debug_level > 0 {
            println!(
                "trim: alpha = {:.6} rad after {} iterations",
                angle_of_attack,
                result.state().get_iter()
            );
        }
        Ok(angle_of_attack)
    }

    /// Trim angle of attack for `seconds`, re-solving only when the queried
    /// time differs from the cached one. The cache is written only after a
    /// successful solve.
    pub fn angle_of_attack_at(
        &self,
        seconds: f64,
        untrimmed_variables: &[f64],
    ) -> Result<f64, SimError> {
        if let Some((cached_time, cached_angle)) = *self.cache.borrow() {
            if cached_time == seconds {
                return Ok(cached_angle);
            }
        }
        let angle_of_attack = self.find_trim_angle(untrimmed_variables)?;
        *self.cache.borrow_mut() = Some((seconds, angle_of_attack));
        Ok(angle_of_attack)
    }

    /// Drops the cached solution so the next query re-solves even at the
    /// same time value.
    pub fn reset_current_time(&self) {
        *self.cache.borrow_mut() = None;
    }
}

/// Registers the trim solver as the angle source of an aerodynamic-angle
/// orientation model, completing that model's closure.
///
/// Per query the installed closure reads the flight condition's current
/// independent variables and sideslip/bank angles, solves (or re-uses) the
/// trim angle of attack for the queried time, and returns the assembled
/// angle set. The closure only reads the flight condition and writes the
/// solver's own cache; it never queries the orientation model back.
pub fn install_trim_closure(
    solver: Rc<TrimSolver>,
    model: &mut AeroAngleRotationalModel,
    conditions: Rc<FlightConditions>,
) {
    model.set_angle_source(Box::new(move |seconds| {
        let variables = conditions.independent_variables();
        let angle_of_attack = solver.angle_of_attack_at(seconds, &variables)?;
        let (sideslip, bank) = conditions.sideslip_and_bank(seconds);
        Ok(AerodynamicAngles::new(angle_of_attack, sideslip, bank))
    }));
}
