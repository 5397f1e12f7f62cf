//! Parameter sets for common compliant actuator builds.
//!
//! Values are representative of commercially available motors and
//! transmissions, not of any specific product datasheet.

use crate::parameters::{ActuatorParameters, Electrical, Limits, Mechanical, Thermal};

const RPM: f64 = std::f64::consts::PI / 30.0;

fn checked(
    name: &str,
    mechanical: Mechanical,
    electrical: Electrical,
    limits: Limits,
    thermal: Option<Thermal>,
) -> ActuatorParameters {
    ActuatorParameters::new(name, mechanical, electrical, limits, thermal)
        .unwrap_or_else(|err| panic!("preset `{name}` is invalid: {err}"))
}

/// Series elastic actuator: flat brushless motor, harmonic drive (100:1) and
/// a torsion spring.
#[must_use]
pub fn harmonic_drive_sea() -> ActuatorParameters {
    checked(
        "harmonic-drive-sea",
        Mechanical {
            motor_inertia: 1.81e-5,
            gear_inertia: 1.0e-5,
            load_inertia: 0.05,
            gear_ratio: 100.0,
            spring_stiffness: 350.0,
            spring_damping: 0.5,
            motor_damping: 1.0e-4,
            load_damping: 0.05,
            stiffness_range: None,
        },
        Electrical {
            torque_constant: 0.0369,
            back_emf_constant: 0.0369,
            resistance: 0.608,
            inductance: 0.463e-3,
        },
        Limits {
            nominal_current: 3.21,
            peak_current: 10.0,
            max_voltage: 24.0,
            max_motor_speed: 6000.0 * RPM,
            max_torque: 40.0,
        },
        Some(Thermal {
            resistance_winding: 2.5,
            resistance_housing: 4.0,
            time_constant_winding: 30.0,
            time_constant_housing: 1500.0,
            max_winding_temperature: 398.15,
            ambient_temperature: 298.15,
        }),
    )
}

/// Variable stiffness joint with an adjustable spring between 20 and 500 N·m/rad.
#[must_use]
pub fn variable_stiffness_joint() -> ActuatorParameters {
    checked(
        "variable-stiffness-joint",
        Mechanical {
            motor_inertia: 3.3e-5,
            gear_inertia: 0.6e-5,
            load_inertia: 0.12,
            gear_ratio: 160.0,
            spring_stiffness: 150.0,
            spring_damping: 0.2,
            motor_damping: 2.0e-4,
            load_damping: 0.1,
            stiffness_range: Some((20.0, 500.0)),
        },
        Electrical {
            torque_constant: 0.0255,
            back_emf_constant: 0.0255,
            resistance: 0.386,
            inductance: 0.21e-3,
        },
        Limits {
            nominal_current: 6.0,
            peak_current: 18.0,
            max_voltage: 48.0,
            max_motor_speed: 8000.0 * RPM,
            max_torque: 60.0,
        },
        None,
    )
}

/// Quasi-direct-drive leg actuator: low ratio planetary stage whose only
/// compliance is the structure itself.
#[must_use]
pub fn quasi_direct_drive() -> ActuatorParameters {
    checked(
        "quasi-direct-drive",
        Mechanical {
            motor_inertia: 6.0e-5,
            gear_inertia: 0.5e-5,
            load_inertia: 0.02,
            gear_ratio: 9.0,
            spring_stiffness: 5000.0,
            spring_damping: 2.0,
            motor_damping: 5.0e-4,
            load_damping: 0.01,
            stiffness_range: None,
        },
        Electrical {
            torque_constant: 0.082,
            back_emf_constant: 0.082,
            resistance: 0.17,
            inductance: 0.06e-3,
        },
        Limits {
            nominal_current: 12.0,
            peak_current: 40.0,
            max_voltage: 24.0,
            max_motor_speed: 2800.0 * RPM,
            max_torque: 30.0,
        },
        Some(Thermal {
            resistance_winding: 1.2,
            resistance_housing: 3.0,
            time_constant_winding: 45.0,
            time_constant_housing: 900.0,
            max_winding_temperature: 393.15,
            ambient_temperature: 298.15,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for params in [
            harmonic_drive_sea(),
            variable_stiffness_joint(),
            quasi_direct_drive(),
        ] {
            assert!(!params.name().is_empty());
            assert!(params.mechanical().gear_ratio >= 1.0);
        }
    }
}
