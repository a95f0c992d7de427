use std::ops::{Add, Sub};

use nalgebra::{Matrix3, UnitQuaternion};

use crate::rotation::{AngularState, RotationalModel};
use crate::utils::errors::SimError;

/// Length of one [`ExtendedTime`] period in seconds.
pub const SECONDS_PER_PERIOD: f64 = 3600.0;

/// Split time representation for long-duration propagation.
///
/// A plain `f64` second count loses resolution as the epoch offset grows;
/// splitting the tally into whole periods plus seconds into the current
/// period keeps sub-microsecond resolution over multi-year spans. The
/// seconds component is always normalized into `[0, SECONDS_PER_PERIOD)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ExtendedTime {
    periods: i64,
    seconds_into_period: f64,
}

impl ExtendedTime {
    pub fn new(periods: i64, seconds_into_period: f64) -> Self {
        let mut time = Self {
            periods,
            seconds_into_period,
        };
        time.normalize();
        time
    }

    pub fn from_seconds(seconds: f64) -> Self {
        Self::new(0, seconds)
    }

    pub fn to_seconds(self) -> f64 {
        self.periods as f64 * SECONDS_PER_PERIOD + self.seconds_into_period
    }

    pub fn periods(self) -> i64 {
        self.periods
    }

    pub fn seconds_into_period(self) -> f64 {
        self.seconds_into_period
    }

    fn normalize(&mut self) {
        let carry = (self.seconds_into_period / SECONDS_PER_PERIOD).floor();
        if carry != 0.0 {
            self.periods += carry as i64;
            self.seconds_into_period -= carry * SECONDS_PER_PERIOD;
        }
    }
}

impl Add<f64> for ExtendedTime {
    type Output = Self;

    fn add(self, seconds: f64) -> Self {
        Self::new(self.periods, self.seconds_into_period + seconds)
    }
}

impl Sub<f64> for ExtendedTime {
    type Output = Self;

    fn sub(self, seconds: f64) -> Self {
        Self::new(self.periods, self.seconds_into_period - seconds)
    }
}

mod private {
    pub trait Sealed {}

    impl Sealed for f64 {}
    impl Sealed for super::ExtendedTime {}
}

/// Time representations accepted by [`RotationalModel`] queries.
///
/// Each implementation routes statically to the matching entry points of the
/// model: plain seconds to the plain methods, [`ExtendedTime`] to the
/// extended ones. The representation is resolved once per call site, at
/// compile time, with no runtime branching. Sealed: exactly these two
/// representations exist.
pub trait SimTime: Copy + private::Sealed {
    fn as_seconds(self) -> f64;

    fn rotation_to_base<M: RotationalModel + ?Sized>(
        self,
        model: &M,
    ) -> Result<UnitQuaternion<f64>, SimError>;

    fn rotation_to_target<M: RotationalModel + ?Sized>(
        self,
        model: &M,
    ) -> Result<UnitQuaternion<f64>, SimError>;

    fn rotation_derivative_to_base<M: RotationalModel + ?Sized>(
        self,
        model: &M,
    ) -> Result<Matrix3<f64>, SimError>;

    fn rotation_derivative_to_target<M: RotationalModel + ?Sized>(
        self,
        model: &M,
    ) -> Result<Matrix3<f64>, SimError>;

    fn full_kinematics<M: RotationalModel + ?Sized>(
        self,
        model: &M,
    ) -> Result<AngularState, SimError>;
}

impl SimTime for f64 {
    fn as_seconds(self) -> f64 {
        self
    }

    fn rotation_to_base<M: RotationalModel + ?Sized>(
        self,
        model: &M,
    ) -> Result<UnitQuaternion<f64>, SimError> {
        model.rotation_to_base(self)
    }

    fn rotation_to_target<M: RotationalModel + ?Sized>(
        self,
        model: &M,
    ) -> Result<UnitQuaternion<f64>, SimError> {
        model.rotation_to_target(self)
    }

    fn rotation_derivative_to_base<M: RotationalModel + ?Sized>(
        self,
        model: &M,
    ) -> Result<Matrix3<f64>, SimError> {
        model.rotation_derivative_to_base(self)
    }

    fn rotation_derivative_to_target<M: RotationalModel + ?Sized>(
        self,
        model: &M,
    ) -> Result<Matrix3<f64>, SimError> {
        model.rotation_derivative_to_target(self)
    }

    fn full_kinematics<M: RotationalModel + ?Sized>(
        self,
        model: &M,
    ) -> Result<AngularState, SimError> {
        model.full_kinematics(self)
    }
}

impl SimTime for ExtendedTime {
    fn as_seconds(self) -> f64 {
        self.to_seconds()
    }

    fn rotation_to_base<M: RotationalModel + ?Sized>(
        self,
        model: &M,
    ) -> Result<UnitQuaternion<f64>, SimError> {
        model.rotation_to_base_extended(self)
    }

    fn rotation_to_target<M: RotationalModel + ?Sized>(
        self,
        model: &M,
    ) -> Result<UnitQuaternion<f64>, SimError> {
        model.rotation_to_target_extended(self)
    }

    fn rotation_derivative_to_base<M: RotationalModel + ?Sized>(
        self,
        model: &M,
    ) -> Result<Matrix3<f64>, SimError> {
        model.rotation_derivative_to_base_extended(self)
    }

    fn rotation_derivative_to_target<M: RotationalModel + ?Sized>(
        self,
        model: &M,
    ) -> Result<Matrix3<f64>, SimError> {
        model.rotation_derivative_to_target_extended(self)
    }

    fn full_kinematics<M: RotationalModel + ?Sized>(
        self,
        model: &M,
    ) -> Result<AngularState, SimError> {
        model.full_kinematics_extended(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalization_carries_whole_periods() {
        let time = ExtendedTime::new(2, 7300.0);
        assert_eq!(time.periods(), 4);
        assert_relative_eq!(time.seconds_into_period(), 100.0);
    }

    #[test]
    fn test_negative_seconds_borrow() {
        let time = ExtendedTime::new(1, -100.0);
        assert_eq!(time.periods(), 0);
        assert_relative_eq!(time.seconds_into_period(), 3500.0);
    }

    #[test]
    fn test_seconds_round_trip() {
        let time = ExtendedTime::from_seconds(12_345.678);
        assert_relative_eq!(time.to_seconds(), 12_345.678, epsilon = 1e-9);
    }

    #[test]
    fn test_arithmetic() {
        let time = ExtendedTime::new(0, 3599.0) + 2.0;
        assert_eq!(time.periods(), 1);
        assert_relative_eq!(time.seconds_into_period(), 1.0, epsilon = 1e-9);

        let earlier = time - 2.0;
        assert_eq!(earlier.periods(), 0);
        assert_relative_eq!(earlier.seconds_into_period(), 3599.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ordering() {
        let a = ExtendedTime::new(0, 3599.0);
        let b = ExtendedTime::new(1, 1.0);
        assert!(a < b);
    }
}
