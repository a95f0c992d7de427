mod common;

use std::rc::Rc;

use approx::assert_relative_eq;
use nalgebra::{UnitQuaternion, Vector3};

use aeroframe::{
    create_shared_coefficient_model, install_trim_closure, AeroAngleCalculator,
    AeroAngleRotationalModel, OrientationError, RotationalModel, SimError, TrimSolver,
    TrimSolverConfig,
};

fn trim_config() -> TrimSolverConfig {
    TrimSolverConfig {
        bracket: (-1.0, 1.0),
        ..TrimSolverConfig::default()
    }
}

#[test]
fn trim_closure_drives_orientation_queries() {
    let coefficients = create_shared_coefficient_model(&common::pitch_moment_settings()).unwrap();
    let conditions = Rc::new(aeroframe::FlightConditions::new(Rc::clone(&coefficients)));
    conditions
        .set_independent_variables(vec![0.5, 0.0])
        .unwrap();

    let mut orientation = AeroAngleRotationalModel::new(AeroAngleCalculator::inertial_fixed());

    // Unresolved closure: every query is rejected.
    assert!(matches!(
        orientation.rotation_to_base(0.0).unwrap_err(),
        SimError::Orientation(OrientationError::ClosureNotReady)
    ));

    let solver = Rc::new(
        TrimSolver::new(Rc::clone(&coefficients), 1, trim_config()).unwrap(),
    );
    install_trim_closure(Rc::clone(&solver), &mut orientation, Rc::clone(&conditions));
    assert!(orientation.closure_complete());

    // Cm = alpha - 0.1 * Mach, so at Mach 0.5 trim is alpha = 0.05.
    let angles = orientation.body_angles(0.0).unwrap();
    assert_relative_eq!(angles.angle_of_attack, 0.05, epsilon = 1e-6);
    assert_relative_eq!(angles.sideslip, 0.0);
    assert_relative_eq!(angles.bank, 0.0);

    // With an inertially fixed trajectory frame and zero sideslip/bank, the
    // body-to-base rotation is a pure pitch by the trim angle.
    let rotation = orientation.rotation_to_base(0.0).unwrap();
    let expected =
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), angles.angle_of_attack).inverse();
    assert_relative_eq!(rotation.angle_to(&expected), 0.0, epsilon = 1e-9);
}

#[test]
fn repeated_and_advancing_query_times_behave_like_an_integrator() {
    let coefficients = create_shared_coefficient_model(&common::pitch_moment_settings()).unwrap();
    let conditions = Rc::new(aeroframe::FlightConditions::new(Rc::clone(&coefficients)));
    conditions
        .set_independent_variables(vec![1.0, 0.0])
        .unwrap();

    let mut orientation = AeroAngleRotationalModel::new(AeroAngleCalculator::inertial_fixed());
    let solver = Rc::new(
        TrimSolver::new(Rc::clone(&coefficients), 1, trim_config()).unwrap(),
    );
    install_trim_closure(Rc::clone(&solver), &mut orientation, Rc::clone(&conditions));

    // Monotone non-decreasing query sequence with repeats, as an integration
    // step's stages produce.
    let mut previous = None;
    for seconds in [0.0, 0.0, 0.5, 0.5, 0.5, 1.0] {
        let rotation = orientation.rotation_to_base(seconds).unwrap();
        if let Some((last_seconds, last_rotation)) = previous {
            if last_seconds == seconds {
                assert_relative_eq!(
                    rotation.angle_to(&last_rotation),
                    0.0,
                    epsilon = 1e-15
                );
            }
        }
        previous = Some((seconds, rotation));
    }
    assert_relative_eq!(
        orientation.body_angles(1.0).unwrap().angle_of_attack,
        0.1,
        epsilon = 1e-6
    );

    // A rejected step retries time 1.0 with a different Mach. Upstream input
    // changed at an unchanged time value: both caches must be reset before
    // re-querying.
    conditions
        .set_independent_variables(vec![2.0, 0.0])
        .unwrap();
    solver.reset_current_time();
    orientation.reset_current_time();

    assert_relative_eq!(
        orientation.body_angles(1.0).unwrap().angle_of_attack,
        0.2,
        epsilon = 1e-6
    );
}

#[test]
fn replacing_the_angle_source_takes_over_from_trim() {
    let coefficients = create_shared_coefficient_model(&common::pitch_moment_settings()).unwrap();
    let conditions = Rc::new(aeroframe::FlightConditions::new(Rc::clone(&coefficients)));
    conditions
        .set_independent_variables(vec![1.0, 0.0])
        .unwrap();

    let mut orientation = AeroAngleRotationalModel::new(AeroAngleCalculator::inertial_fixed());
    let solver = Rc::new(
        TrimSolver::new(Rc::clone(&coefficients), 1, trim_config()).unwrap(),
    );
    install_trim_closure(solver, &mut orientation, conditions);
    assert_relative_eq!(
        orientation.body_angles(0.0).unwrap().angle_of_attack,
        0.1,
        epsilon = 1e-6
    );

    // External guidance takes the angle slot; the last registration wins.
    orientation.set_angle_source(Box::new(|_| {
        Ok(aeroframe::AerodynamicAngles::from_degrees(2.0, 0.0, 0.0))
    }));
    orientation.reset_current_time();
    assert_relative_eq!(
        orientation.body_angles(0.0).unwrap().angle_of_attack,
        2.0_f64.to_radians(),
        epsilon = 1e-12
    );
}
