//! Unit aliases for actuator quantities that `uom` does not name.
//!
//! Angles are dimensionless in the SI system, so a torsional stiffness in
//! N·m/rad shares the dimension of energy, and a rotational damping in
//! N·m·s/rad shares the dimension of action. The aliases below keep those
//! quantities distinct at the API level even though the dimensions coincide.

use uom::{
    si::{
        ISQ, Quantity, SI,
        electric_current::ampere,
        energy::joule,
        f64::{ElectricCurrent, Energy, Power, TemperatureInterval, Time},
        power::watt,
        temperature_interval::kelvin as delta_kelvin,
        time::second,
    },
    typenum::{N1, N2, P1, P2, P3, Z0},
};

/// Torsional stiffness, N·m/rad in SI.
pub type TorsionalStiffness = Quantity<ISQ<P2, P1, N2, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Rotational viscous damping, N·m·s/rad in SI.
pub type RotationalDamping = Quantity<ISQ<P2, P1, N1, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Motor torque constant, N·m/A in SI.
///
/// For a motor in consistent SI units this equals the back-EMF constant in V·s/rad.
pub type TorqueConstant = Quantity<ISQ<P2, P1, N2, N1, Z0, Z0, Z0>, SI<f64>, f64>;

/// Motor back-EMF constant, V·s/rad in SI. Dimensionally a torque constant.
pub type BackEmfConstant = TorqueConstant;

/// Thermal resistance, K/W in SI.
pub type ThermalResistance = Quantity<ISQ<N2, N1, P3, Z0, P1, Z0, Z0>, SI<f64>, f64>;

/// Creates a torsional stiffness from a value in N·m/rad.
#[must_use]
pub fn torsional_stiffness_si(value: f64) -> TorsionalStiffness {
    Energy::new::<joule>(value)
}

/// Creates a rotational damping from a value in N·m·s/rad.
#[must_use]
pub fn rotational_damping_si(value: f64) -> RotationalDamping {
    Energy::new::<joule>(value) * Time::new::<second>(1.0)
}

/// Creates a torque constant from a value in N·m/A.
#[must_use]
pub fn torque_constant_si(value: f64) -> TorqueConstant {
    Energy::new::<joule>(value) / ElectricCurrent::new::<ampere>(1.0)
}

/// Creates a thermal resistance from a value in K/W.
#[must_use]
pub fn thermal_resistance_si(value: f64) -> ThermalResistance {
    TemperatureInterval::new::<delta_kelvin>(value) / Power::new::<watt>(1.0)
}
