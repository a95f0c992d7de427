pub mod coefficients;
pub mod flight;
pub mod kinematics;
pub mod rotation;
pub mod time;
pub mod trim;
pub mod utils;

pub use coefficients::{
    create_coefficient_model, create_shared_coefficient_model, AxisTables, CoefficientError,
    CoefficientModel, CoefficientSettings, CoefficientTable, MergedTable, ScalarTable,
    SettingsKind, SharedCoefficientModel, TabulatedCoefficients,
};
pub use flight::FlightConditions;
pub use rotation::{
    AeroAngleCalculator, AeroAngleRotationalModel, AerodynamicAngles, AngularState,
    OrientationError, RotationalModel, RotationalModelExt, UniformRotationModel,
};
pub use time::{ExtendedTime, SimTime};
pub use trim::{install_trim_closure, TrimError, TrimSolver, TrimSolverConfig};
pub use utils::errors::SimError;
