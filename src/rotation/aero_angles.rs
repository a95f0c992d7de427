use std::cell::RefCell;

use nalgebra::{Matrix3, UnitQuaternion, Vector3};

use super::{OrientationError, RotationalModel};
use crate::utils::errors::SimError;

/// Aerodynamic orientation angles relating body axes to the relative-wind
/// direction, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AerodynamicAngles {
    pub angle_of_attack: f64,
    pub sideslip: f64,
    pub bank: f64,
}

impl AerodynamicAngles {
    pub fn new(angle_of_attack: f64, sideslip: f64, bank: f64) -> Self {
        Self {
            angle_of_attack,
            sideslip,
            bank,
        }
    }

    pub fn from_degrees(angle_of_attack: f64, sideslip: f64, bank: f64) -> Self {
        Self::new(
            angle_of_attack.to_radians(),
            sideslip.to_radians(),
            bank.to_radians(),
        )
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// Supplier of aerodynamic angles as a function of time.
///
/// Ownership of the angles transfers to whichever component currently holds
/// this slot: a prescribed guidance profile, a trim solver, or an external
/// ephemeris.
pub type AngleSourceFn = Box<dyn Fn(f64) -> Result<AerodynamicAngles, SimError>>;

/// Rotation from the trajectory frame to the base (inertial) frame as a
/// function of time. This is where the vehicle's translational state enters
/// the orientation chain.
pub type TrajectoryRotationFn = Box<dyn Fn(f64) -> UnitQuaternion<f64>>;

/// Converts aerodynamic angles plus the current trajectory-frame rotation
/// into a body-to-base orientation.
pub struct AeroAngleCalculator {
    trajectory_to_base: TrajectoryRotationFn,
}

impl AeroAngleCalculator {
    pub fn new(trajectory_to_base: TrajectoryRotationFn) -> Self {
        Self { trajectory_to_base }
    }

    /// Calculator for the case where the trajectory frame coincides with the
    /// base frame at all times.
    pub fn inertial_fixed() -> Self {
        Self::new(Box::new(|_| UnitQuaternion::identity()))
    }

    /// Rotation from the body frame to the base frame at `seconds` for the
    /// given angles.
    pub fn body_to_base(&self, seconds: f64, angles: &AerodynamicAngles) -> UnitQuaternion<f64> {
        let trajectory_to_base = (self.trajectory_to_base)(seconds);
        trajectory_to_base * Self::trajectory_to_body(angles).inverse()
    }

    // Trajectory -> aerodynamic frame by the bank angle about x, then
    // aerodynamic -> body frame by sideslip about z and angle of attack
    // about y.
    fn trajectory_to_body(angles: &AerodynamicAngles) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), angles.angle_of_attack)
            * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), -angles.sideslip)
            * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), angles.bank)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClosureState {
    Unresolved,
    Resolved,
}

#[derive(Clone, Copy)]
struct AngleCache {
    seconds: f64,
    angles: AerodynamicAngles,
    rotation_to_base: UnitQuaternion<f64>,
}

/// Orientation model whose value is derived from aerodynamic angles that may
/// themselves depend on the vehicle's trajectory.
///
/// The mutual dependency between orientation and angles is closed at runtime
/// by registering an angle source ([`Self::set_angle_source`]); until then
/// the model is unresolved and every query fails with
/// [`OrientationError::ClosureNotReady`]. A registered source must only
/// compute and return angles for the requested time; it must never query
/// this model back, or the lookup would recurse without bound.
///
/// Queries at the cached time are answered from the cache without invoking
/// the angle source again; an integration step's stages may probe the same
/// instant repeatedly. The cache is committed only after the source call and
/// the rotation composition have both succeeded.
pub struct AeroAngleRotationalModel {
    angle_calculator: AeroAngleCalculator,
    angle_source: Option<AngleSourceFn>,
    closure: ClosureState,
    cache: RefCell<Option<AngleCache>>,
}

impl AeroAngleRotationalModel {
    pub fn new(angle_calculator: AeroAngleCalculator) -> Self {
        Self {
            angle_calculator,
            angle_source: None,
            closure: ClosureState::Unresolved,
            cache: RefCell::new(None),
        }
    }

    /// Registers or replaces the angle supplier and completes the closure.
    ///
    /// The last registration wins; replacing an earlier source is not an
    /// error. A replacement does not clear the time cache; follow it with
    /// [`Self::reset_current_time`] before re-querying an already-queried
    /// time.
    pub fn set_angle_source(&mut self, source: AngleSourceFn) {
        self.angle_source = Some(source);
        self.closure = ClosureState::Resolved;
    }

    pub fn closure_complete(&self) -> bool {
        self.closure == ClosureState::Resolved
    }

    /// Recomputes the cached orientation for `seconds` unless it is already
    /// current for exactly that time value.
    pub fn update(&self, seconds: f64) -> Result<(), SimError> {
        self.resolve(seconds).map(|_| ())
    }

    /// The aerodynamic angles in effect at `seconds`, updating first.
    pub fn body_angles(&self, seconds: f64) -> Result<AerodynamicAngles, SimError> {
        Ok(self.resolve(seconds)?.angles)
    }

    /// Clears the cached time so the next query recomputes even at the same
    /// time value. Required after an upstream, non-time input changed, e.g. a
    /// replaced angle source, a re-trim, a rejected and retried step.
    pub fn reset_current_time(&self) {
        *self.cache.borrow_mut() = None;
    }

    fn resolve(&self, seconds: f64) -> Result<AngleCache, SimError> {
        if let Some(cache) = self.cache.borrow().as_ref() {
            if cache.seconds == seconds {
                return Ok(*cache);
            }
        }

        let source = self
            .angle_source
            .as_ref()
            .ok_or(OrientationError::ClosureNotReady)?;
        let angles = source(seconds)?;
        let rotation_to_base = self.angle_calculator.body_to_base(seconds, &angles);

        let entry = AngleCache {
            seconds,
            angles,
            rotation_to_base,
        };
        *self.cache.borrow_mut() = Some(entry);
        Ok(entry)
    }
}

impl RotationalModel for AeroAngleRotationalModel {
    fn rotation_to_base(&self, seconds: f64) -> Result<UnitQuaternion<f64>, SimError> {
        Ok(self.resolve(seconds)?.rotation_to_base)
    }

    // No closed-form differentiation of the angle-to-rotation map exists, so
    // derivative and angular-velocity queries are rejected outright instead
    // of returning a placeholder.
    fn rotation_derivative_to_base(&self, _seconds: f64) -> Result<Matrix3<f64>, SimError> {
        Err(OrientationError::UnsupportedOperation {
            operation: "rotation matrix derivative of an aerodynamic-angle-based orientation",
        }
        .into())
    }
}
