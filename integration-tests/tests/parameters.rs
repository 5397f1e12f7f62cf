use actuate_core::{
    ActuatorParameters,
    parameters::{Electrical, Limits},
    presets,
    units::{rotational_damping_si, torque_constant_si, torsional_stiffness_si},
};
use actuate_models::ActuatorModel;
use approx::assert_relative_eq;
use integration_tests::{ElectricSea, RigidJoint};
use uom::si::{
    angular_velocity::radian_per_second,
    electric_current::ampere,
    electric_potential::volt,
    electrical_resistance::ohm,
    f64::{
        AngularVelocity, ElectricCurrent, ElectricPotential, ElectricalResistance, Inductance,
        Torque,
    },
    inductance::henry,
    moment_of_inertia::kilogram_square_meter,
    thermodynamic_temperature::kelvin,
    torque::newton_meter,
};

#[test]
fn parameter_sets_round_trip_through_json() {
    for params in [
        presets::harmonic_drive_sea(),
        presets::variable_stiffness_joint(),
        presets::quasi_direct_drive(),
    ] {
        let json = serde_json::to_string(&params).unwrap();
        let back: ActuatorParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}

#[test]
fn deserialization_validates() {
    let mut value = serde_json::to_value(presets::harmonic_drive_sea()).unwrap();
    value["mechanical"]["load_inertia"] = serde_json::json!(-0.5);

    let err = serde_json::from_value::<ActuatorParameters>(value).unwrap_err();
    assert!(err.to_string().contains("load_inertia"), "{err}");
}

#[test]
fn thermal_model_is_optional() {
    let mut value = serde_json::to_value(presets::harmonic_drive_sea()).unwrap();
    value.as_object_mut().unwrap().remove("thermal");

    let params: ActuatorParameters = serde_json::from_value(value).unwrap();
    assert!(params.thermal().is_none());
    assert!(params.thermal_current_limit().is_none());
}

#[test]
fn stiffness_range_adds_symbols() {
    let fixed = RigidJoint::new(presets::harmonic_drive_sea()).substitution();
    assert!(fixed.contains("k"));
    assert!(!fixed.contains("k_min"));
    assert!(!fixed.contains("k_max"));

    let variable = ElectricSea::new(presets::variable_stiffness_joint()).substitution();
    assert_eq!(variable.value("k_min"), Some(20.0));
    assert_eq!(variable.value("k_max"), Some(500.0));
    assert_eq!(variable.value("k"), Some(150.0));
}

#[test]
fn stiffness_sweeps_stay_within_range() {
    let params = presets::variable_stiffness_joint();

    assert!(params.with_stiffness(20.0).is_ok());
    assert!(params.with_stiffness(500.0).is_ok());
    assert!(params.with_stiffness(501.0).is_err());
    assert!(presets::harmonic_drive_sea().with_stiffness(-1.0).is_err());
}

#[test]
fn typed_getters_mirror_the_si_fields() {
    let params = presets::quasi_direct_drive();
    let m = *params.mechanical();
    let e = *params.electrical();
    let l = *params.limits();

    assert_relative_eq!(params.motor_inertia().get::<kilogram_square_meter>(), m.motor_inertia);
    assert_relative_eq!(params.gear_inertia().get::<kilogram_square_meter>(), m.gear_inertia);
    assert_relative_eq!(params.load_inertia().get::<kilogram_square_meter>(), m.load_inertia);
    assert_relative_eq!(params.spring_stiffness().value, m.spring_stiffness);
    assert_relative_eq!(params.spring_damping().value, m.spring_damping);
    assert_relative_eq!(params.motor_damping().value, m.motor_damping);
    assert_relative_eq!(params.load_damping().value, m.load_damping);

    assert_relative_eq!(params.torque_constant().value, e.torque_constant);
    assert_relative_eq!(params.back_emf_constant().value, e.back_emf_constant);
    assert_relative_eq!(params.resistance().get::<ohm>(), e.resistance);
    assert_relative_eq!(params.inductance().get::<henry>(), e.inductance);

    assert_relative_eq!(params.nominal_current().get::<ampere>(), l.nominal_current);
    assert_relative_eq!(params.peak_current().get::<ampere>(), l.peak_current);
    assert_relative_eq!(params.max_voltage().get::<volt>(), l.max_voltage);
    assert_relative_eq!(
        params.max_motor_speed().get::<radian_per_second>(),
        l.max_motor_speed
    );
    assert_relative_eq!(params.max_torque().get::<newton_meter>(), l.max_torque);

    let thermal = params.thermal().unwrap();
    assert_relative_eq!(
        params.max_winding_temperature().unwrap().get::<kelvin>(),
        thermal.max_winding_temperature
    );
    assert_relative_eq!(
        params.ambient_temperature().unwrap().get::<kelvin>(),
        thermal.ambient_temperature
    );
}

#[test]
fn typed_construction_matches_plain_si() {
    let reference = presets::harmonic_drive_sea();

    let electrical = Electrical::from_quantities(
        torque_constant_si(0.0369),
        torque_constant_si(0.0369),
        ElectricalResistance::new::<ohm>(0.608),
        Inductance::new::<henry>(0.463e-3),
    );
    let limits = Limits::from_quantities(
        ElectricCurrent::new::<ampere>(3.21),
        ElectricCurrent::new::<ampere>(10.0),
        ElectricPotential::new::<volt>(24.0),
        AngularVelocity::new::<radian_per_second>(reference.limits().max_motor_speed),
        Torque::new::<newton_meter>(40.0),
    );
    assert_eq!(&electrical, reference.electrical());
    assert_eq!(&limits, reference.limits());

    let params = ActuatorParameters::new(
        reference.name(),
        *reference.mechanical(),
        electrical,
        limits,
        reference.thermal().copied(),
    )
    .unwrap();
    assert_eq!(params, reference);
}

#[test]
fn typed_setters_feed_the_models() {
    let mut params = presets::harmonic_drive_sea();
    params.set_spring_stiffness(torsional_stiffness_si(900.0)).unwrap();
    params.set_spring_damping(rotational_damping_si(1.5)).unwrap();
    params.set_back_emf_constant(torque_constant_si(0.04)).unwrap();

    let sub = ElectricSea::new(params.clone()).substitution();
    assert_eq!(sub.value("k"), Some(900.0));
    assert_eq!(sub.value("d_s"), Some(1.5));
    assert_eq!(sub.value("K_e"), Some(0.04));

    let before = params.clone();
    assert!(params.set_resistance(ElectricalResistance::new::<ohm>(0.0)).is_err());
    assert!(params.set_torque_constant(torque_constant_si(f64::NAN)).is_err());
    assert_eq!(params, before);
}
