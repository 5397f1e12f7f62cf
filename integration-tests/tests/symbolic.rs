use std::collections::BTreeSet;

use actuate_core::presets;
use actuate_models::{ActuatorModel, NonlinearActuatorModel, OperatingPoint};
use actuate_symbolic::{Expr, Substitution};
use approx::assert_relative_eq;
use integration_tests::{ElectricSea, ProgressiveSpringJoint, RigidJoint};

fn names(symbols: &[&str]) -> BTreeSet<String> {
    symbols.iter().map(|s| (*s).to_owned()).collect()
}

#[test]
fn symbolic_matrices_name_their_parameters() {
    let model = RigidJoint::new(presets::harmonic_drive_sea());
    let symbolic = model.symbolic_state_space().unwrap();

    assert_eq!(
        symbolic.a().symbols(),
        names(&["J_g", "J_l", "J_m", "N", "d_l", "d_m"])
    );
    assert_eq!(
        symbolic.b().symbols(),
        names(&["J_g", "J_l", "J_m", "K_t", "N"])
    );
    assert!(symbolic.c().symbols().is_empty());
    assert!(symbolic.d().is_zero());
}

#[test]
fn partial_substitution_then_completion() {
    let model = RigidJoint::new(presets::harmonic_drive_sea());
    let symbolic = model.symbolic_state_space().unwrap();

    let geared = symbolic.bind(&Substitution::new().with_value("N", 100.0));
    assert!(!geared.symbols().contains("N"));
    assert!(geared.symbols().contains("K_t"));

    let numeric = geared.substitute(&model.substitution()).unwrap();
    let direct = model.state_space().unwrap();
    assert_relative_eq!(*numeric.a(), *direct.a(), max_relative = 1e-12);
    assert_relative_eq!(*numeric.b(), *direct.b(), max_relative = 1e-12);
}

#[test]
fn expression_bindings_rewrite_parameters() {
    let params = presets::variable_stiffness_joint();
    let model = ElectricSea::new(params.clone());

    // Evaluate at the soft end of the stiffness range by rewriting `k`.
    let mut values = model.substitution();
    values.insert_expr("k", Expr::symbol("k_min"));

    let soft = model.symbolic_state_space().unwrap().substitute(&values).unwrap();
    let expected = ElectricSea::new(params.with_stiffness(20.0).unwrap())
        .state_space()
        .unwrap();

    assert_relative_eq!(*soft.a(), *expected.a(), max_relative = 1e-12);
    assert_relative_eq!(*soft.c(), *expected.c(), max_relative = 1e-12);
}

#[test]
fn linearization_keeps_nonlinear_parameters_away_from_rest() {
    let model = ProgressiveSpringJoint::new(presets::variable_stiffness_joint());

    let at_rest = model
        .symbolic_linearization(&OperatingPoint::origin(4, 1))
        .unwrap();
    assert!(!at_rest.symbols().contains("k_max"));

    let twisted = model
        .symbolic_linearization(&OperatingPoint::new(vec![0.3, 0.0, 0.0, 0.0], vec![0.0]))
        .unwrap();
    let entry = twisted.a().get(2, 0).unwrap();
    assert!(entry.contains_symbol("k_max"));
    assert!(!entry.contains_symbol("theta"));
}

#[test]
fn nonlinear_right_hand_side_matches_hand_evaluation() {
    let params = presets::variable_stiffness_joint();
    let model = ProgressiveSpringJoint::new(params.clone());
    let m = params.mechanical();
    let (k, k_max) = (m.spring_stiffness, 500.0);

    let x = actuate_lti::DVector::from_vec(vec![0.4, 0.1, 2.0, -1.0]);
    let u = actuate_lti::DVector::from_element(1, 5.0);

    let twist: f64 = 0.3;
    let spring_torque = k * twist + (k_max - k) * twist.powi(3) / 3.0;
    let spring = spring_torque + m.spring_damping * 3.0;
    let n2 = m.gear_ratio.powi(2);
    let reflected = (m.motor_inertia + m.gear_inertia) * n2;

    let dx = model.derivative(&x, &u).unwrap();
    assert_relative_eq!(dx[0], 2.0);
    assert_relative_eq!(dx[1], -1.0);
    assert_relative_eq!(
        dx[2],
        (5.0 - spring - m.motor_damping * n2 * 2.0) / reflected,
        max_relative = 1e-12
    );
    assert_relative_eq!(
        dx[3],
        (spring + m.load_damping) / m.load_inertia,
        max_relative = 1e-12
    );

    let y = model.output(&x, &u).unwrap();
    assert_relative_eq!(y[0], 0.1);
    assert_relative_eq!(y[1], spring_torque, max_relative = 1e-12);
}
