mod aero_angles;
mod error;
mod uniform;

pub use aero_angles::{
    AeroAngleCalculator, AeroAngleRotationalModel, AerodynamicAngles, AngleSourceFn,
    TrajectoryRotationFn,
};
pub use error::OrientationError;
pub use uniform::UniformRotationModel;

use nalgebra::{Matrix3, UnitQuaternion, Vector3};

use crate::kinematics;
use crate::time::{ExtendedTime, SimTime};
use crate::utils::errors::SimError;

/// Full rotational state of a frame pair at one instant.
///
/// Built through [`RotationalModel::full_kinematics`], so the angular
/// velocity always satisfies the kinematic identity with the other two
/// fields.
#[derive(Debug, Clone, Copy)]
pub struct AngularState {
    /// Rotation from the base frame to the target frame.
    pub rotation_to_target: UnitQuaternion<f64>,
    /// Time derivative of the rotation matrix to the target frame.
    pub rotation_to_target_derivative: Matrix3<f64>,
    /// Angular velocity of the target frame, expressed in the base frame.
    pub angular_velocity_in_base: Vector3<f64>,
}

/// Provider of the rotation between a base frame and a target frame as a
/// function of time.
///
/// Models implement the plain-seconds entry points; the `_extended` pair
/// exists for high-precision time representations and collapses to the plain
/// path by default. Callers generic over the time representation go through
/// [`RotationalModelExt`] instead of picking an entry point by hand.
pub trait RotationalModel {
    /// Rotation from the target frame to the base frame at `seconds`.
    fn rotation_to_base(&self, seconds: f64) -> Result<UnitQuaternion<f64>, SimError>;

    /// Rotation from the base frame to the target frame at `seconds`.
    ///
    /// Required identity: equal to `rotation_to_base(seconds).inverse()` for
    /// every time. Override only with an implementation that is equivalent
    /// by construction.
    fn rotation_to_target(&self, seconds: f64) -> Result<UnitQuaternion<f64>, SimError> {
        Ok(self.rotation_to_base(seconds)?.inverse())
    }

    /// Time derivative of the rotation matrix to the base frame.
    fn rotation_derivative_to_base(&self, seconds: f64) -> Result<Matrix3<f64>, SimError>;

    /// Time derivative of the rotation matrix to the target frame.
    fn rotation_derivative_to_target(&self, seconds: f64) -> Result<Matrix3<f64>, SimError> {
        Ok(self.rotation_derivative_to_base(seconds)?.transpose())
    }

    /// Orientation, orientation derivative and angular velocity at `seconds`.
    fn full_kinematics(&self, seconds: f64) -> Result<AngularState, SimError> {
        let rotation_to_target = self.rotation_to_target(seconds)?;
        let rotation_to_target_derivative = self.rotation_derivative_to_target(seconds)?;
        let target_matrix = rotation_to_target.to_rotation_matrix().into_inner();
        let angular_velocity_in_base = kinematics::angular_velocity_in_base_frame(
            &target_matrix,
            &rotation_to_target_derivative.transpose(),
        );
        Ok(AngularState {
            rotation_to_target,
            rotation_to_target_derivative,
            angular_velocity_in_base,
        })
    }

    fn rotation_to_base_extended(
        &self,
        time: ExtendedTime,
    ) -> Result<UnitQuaternion<f64>, SimError> {
        self.rotation_to_base(time.to_seconds())
    }

    fn rotation_to_target_extended(
        &self,
        time: ExtendedTime,
    ) -> Result<UnitQuaternion<f64>, SimError> {
        self.rotation_to_target(time.to_seconds())
    }

    fn rotation_derivative_to_base_extended(
        &self,
        time: ExtendedTime,
    ) -> Result<Matrix3<f64>, SimError> {
        self.rotation_derivative_to_base(time.to_seconds())
    }

    fn rotation_derivative_to_target_extended(
        &self,
        time: ExtendedTime,
    ) -> Result<Matrix3<f64>, SimError> {
        self.rotation_derivative_to_target(time.to_seconds())
    }

    fn full_kinematics_extended(&self, time: ExtendedTime) -> Result<AngularState, SimError> {
        self.full_kinematics(time.to_seconds())
    }
}

/// Time-representation-generic entry points, resolved per call site.
pub trait RotationalModelExt: RotationalModel {
    fn rotation_to_base_at<T: SimTime>(&self, time: T) -> Result<UnitQuaternion<f64>, SimError> {
        time.rotation_to_base(self)
    }

    fn rotation_to_target_at<T: SimTime>(
        &self,
        time: T,
    ) -> Result<UnitQuaternion<f64>, SimError> {
        time.rotation_to_target(self)
    }

    fn rotation_derivative_to_base_at<T: SimTime>(
        &self,
        time: T,
    ) -> Result<Matrix3<f64>, SimError> {
        time.rotation_derivative_to_base(self)
    }

    fn rotation_derivative_to_target_at<T: SimTime>(
        &self,
        time: T,
    ) -> Result<Matrix3<f64>, SimError> {
        time.rotation_derivative_to_target(self)
    }

    fn full_kinematics_at<T: SimTime>(&self, time: T) -> Result<AngularState, SimError> {
        time.full_kinematics(self)
    }
}

impl<M: RotationalModel + ?Sized> RotationalModelExt for M {}
