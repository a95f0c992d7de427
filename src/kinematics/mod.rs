use nalgebra::{Matrix3, Vector3};

/// Angular velocity of the target frame w.r.t. the base frame, expressed in
/// the base frame, from the rotation to the target frame and the time
/// derivative of the rotation to the base frame.
///
/// The product `Ṗ·R` of the derivative and the to-target rotation is
/// antisymmetric whenever `R` is orthonormal and `Ṗ` is the true derivative
/// of its transpose; its three independent entries are the angular velocity
/// components. Neither precondition is checked here.
pub fn angular_velocity_in_base_frame(
    rotation_to_target: &Matrix3<f64>,
    rotation_to_base_derivative: &Matrix3<f64>,
) -> Vector3<f64> {
    let cross_product_matrix = rotation_to_base_derivative * rotation_to_target;
    Vector3::new(
        cross_product_matrix[(2, 1)],
        cross_product_matrix[(0, 2)],
        cross_product_matrix[(1, 0)],
    )
}

/// Time derivative of the rotation to the target frame, from that rotation
/// and the angular velocity of the target frame expressed in the base frame.
///
/// Inverse of [`angular_velocity_in_base_frame`]: `Ṙ = skew(−R·ω)·R`.
pub fn rotation_to_target_derivative(
    rotation_to_target: &Matrix3<f64>,
    angular_velocity_in_base: &Vector3<f64>,
) -> Matrix3<f64> {
    (-(rotation_to_target * angular_velocity_in_base)).cross_matrix() * rotation_to_target
}
