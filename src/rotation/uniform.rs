use nalgebra::{Matrix3, Unit, UnitQuaternion, Vector3};

use super::RotationalModel;
use crate::kinematics;
use crate::time::{ExtendedTime, SECONDS_PER_PERIOD};
use crate::utils::errors::SimError;

/// Rotation at a constant rate about a fixed axis, e.g. a uniformly
/// spinning central body or a steadily banking trajectory frame.
///
/// All queries have closed forms, so this model supports the complete
/// [`RotationalModel`] capability set.
#[derive(Debug, Clone)]
pub struct UniformRotationModel {
    initial_rotation_to_base: UnitQuaternion<f64>,
    axis: Unit<Vector3<f64>>,
    rotation_rate: f64,
}

impl UniformRotationModel {
    /// `axis` is expressed in the base frame; `rotation_rate` is in rad/s.
    pub fn new(
        initial_rotation_to_base: UnitQuaternion<f64>,
        axis: Unit<Vector3<f64>>,
        rotation_rate: f64,
    ) -> Self {
        Self {
            initial_rotation_to_base,
            axis,
            rotation_rate,
        }
    }

    /// Angular velocity of the target frame in the base frame (constant).
    pub fn angular_velocity(&self) -> Vector3<f64> {
        self.axis.into_inner() * self.rotation_rate
    }

    fn rotation_for_angle(&self, angle: f64) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&self.axis, angle) * self.initial_rotation_to_base
    }
}

impl RotationalModel for UniformRotationModel {
    fn rotation_to_base(&self, seconds: f64) -> Result<UnitQuaternion<f64>, SimError> {
        Ok(self.rotation_for_angle(self.rotation_rate * seconds))
    }

    fn rotation_derivative_to_base(&self, seconds: f64) -> Result<Matrix3<f64>, SimError> {
        let rotation_to_target = self
            .rotation_to_base(seconds)?
            .inverse()
            .to_rotation_matrix()
            .into_inner();
        Ok(
            kinematics::rotation_to_target_derivative(
                &rotation_to_target,
                &self.angular_velocity(),
            )
            .transpose(),
        )
    }

    // Accumulating the rotation angle per whole period, reduced modulo a full
    // turn before the fractional part is added, keeps the phase accurate long
    // after `rate * t` has outgrown f64 resolution.
    fn rotation_to_base_extended(
        &self,
        time: ExtendedTime,
    ) -> Result<UnitQuaternion<f64>, SimError> {
        let angle_per_period = (self.rotation_rate * SECONDS_PER_PERIOD) % std::f64::consts::TAU;
        let whole_angle = (time.periods() as f64 * angle_per_period) % std::f64::consts::TAU;
        Ok(self.rotation_for_angle(
            whole_angle + self.rotation_rate * time.seconds_into_period(),
        ))
    }

    fn rotation_to_target_extended(
        &self,
        time: ExtendedTime,
    ) -> Result<UnitQuaternion<f64>, SimError> {
        Ok(self.rotation_to_base_extended(time)?.inverse())
    }
}
