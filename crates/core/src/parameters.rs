//! Physical parameter sets for compliant joint actuators.
//!
//! An [`ActuatorParameters`] groups everything needed to describe one
//! actuator: the mechanical chain (motor, gearbox, spring, load), the motor's
//! electrical constants, its operating limits and, when known, a lumped
//! two-node thermal model of the winding.
//!
//! All values are stored as plain SI `f64` so they can feed symbolic
//! substitution and matrix assembly directly. Typed `uom` getters and setters
//! are provided for each physical field; setters revalidate the whole set.

mod error;
mod symbols;

use tracing::debug;
use uom::si::{
    angular_velocity::radian_per_second,
    electric_current::ampere,
    electric_potential::volt,
    electrical_resistance::ohm,
    f64::{
        AngularVelocity, ElectricCurrent, ElectricPotential, ElectricalResistance, Inductance,
        MomentOfInertia, ThermodynamicTemperature, Time, Torque,
    },
    inductance::henry,
    moment_of_inertia::kilogram_square_meter,
    thermodynamic_temperature::kelvin,
    time::second,
    torque::newton_meter,
};

use crate::{
    constraint::{NonNegative, StrictlyPositive},
    units::{
        BackEmfConstant, RotationalDamping, ThermalResistance, TorqueConstant, TorsionalStiffness,
        rotational_damping_si, thermal_resistance_si, torque_constant_si, torsional_stiffness_si,
    },
};

pub use error::ParameterError;
pub use symbols::{SymbolTable, names};

/// Inertias, transmission and compliance of the drive train.
///
/// The motor side sits before the gearbox, the load side after the spring.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub struct Mechanical {
    /// Rotor inertia (kg·m²).
    pub motor_inertia: f64,
    /// Gearbox inertia seen at the motor shaft (kg·m²).
    pub gear_inertia: f64,
    /// Load-side inertia (kg·m²).
    pub load_inertia: f64,
    /// Transmission ratio, motor turns per output turn.
    pub gear_ratio: f64,
    /// Series spring stiffness (N·m/rad).
    pub spring_stiffness: f64,
    /// Viscous damping across the spring (N·m·s/rad).
    pub spring_damping: f64,
    /// Viscous damping at the motor shaft (N·m·s/rad).
    pub motor_damping: f64,
    /// Viscous damping at the load (N·m·s/rad).
    pub load_damping: f64,
    /// Reachable stiffness interval for variable-stiffness designs (N·m/rad).
    #[cfg_attr(feature = "serde-derive", serde(default))]
    pub stiffness_range: Option<(f64, f64)>,
}

/// Electrical constants of the motor winding.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub struct Electrical {
    /// Torque constant (N·m/A).
    pub torque_constant: f64,
    /// Back-EMF constant (V·s/rad).
    pub back_emf_constant: f64,
    /// Terminal resistance (Ω).
    pub resistance: f64,
    /// Terminal inductance (H).
    pub inductance: f64,
}

impl Electrical {
    /// Builds the electrical constants from typed quantities.
    #[must_use]
    pub fn from_quantities(
        torque_constant: TorqueConstant,
        back_emf_constant: BackEmfConstant,
        resistance: ElectricalResistance,
        inductance: Inductance,
    ) -> Self {
        Self {
            torque_constant: torque_constant.value,
            back_emf_constant: back_emf_constant.value,
            resistance: resistance.get::<ohm>(),
            inductance: inductance.get::<henry>(),
        }
    }
}

/// Operating limits.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub struct Limits {
    /// Continuous current rating (A).
    pub nominal_current: f64,
    /// Short-term current rating (A).
    pub peak_current: f64,
    /// Supply voltage (V).
    pub max_voltage: f64,
    /// Maximum motor speed (rad/s, motor side).
    pub max_motor_speed: f64,
    /// Maximum output torque (N·m, load side).
    pub max_torque: f64,
}

impl Limits {
    /// Builds the operating limits from typed quantities.
    #[must_use]
    pub fn from_quantities(
        nominal_current: ElectricCurrent,
        peak_current: ElectricCurrent,
        max_voltage: ElectricPotential,
        max_motor_speed: AngularVelocity,
        max_torque: Torque,
    ) -> Self {
        Self {
            nominal_current: nominal_current.get::<ampere>(),
            peak_current: peak_current.get::<ampere>(),
            max_voltage: max_voltage.get::<volt>(),
            max_motor_speed: max_motor_speed.get::<radian_per_second>(),
            max_torque: max_torque.get::<newton_meter>(),
        }
    }
}

/// Two-node lumped thermal model: winding → housing → ambient.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub struct Thermal {
    /// Winding to housing thermal resistance (K/W).
    pub resistance_winding: f64,
    /// Housing to ambient thermal resistance (K/W).
    pub resistance_housing: f64,
    /// Winding thermal time constant (s).
    pub time_constant_winding: f64,
    /// Housing thermal time constant (s).
    pub time_constant_housing: f64,
    /// Maximum permissible winding temperature (K).
    pub max_winding_temperature: f64,
    /// Ambient temperature (K).
    pub ambient_temperature: f64,
}

/// A validated parameter set for one actuator.
///
/// Construct it with [`ActuatorParameters::new`], which checks every field,
/// or deserialize it (with the `serde-derive` feature), which runs the same
/// checks.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Unchecked", into = "Unchecked")
)]
pub struct ActuatorParameters {
    name: String,
    mechanical: Mechanical,
    electrical: Electrical,
    limits: Limits,
    thermal: Option<Thermal>,
}

/// Generates a typed getter and a validating typed setter for each listed field.
macro_rules! quantity_accessors {
    ($($group:ident.$field:ident: $quantity:ty = $make:expr, $getter:ident, $setter:ident;)*) => {
        $(
            #[doc = concat!("Returns `", stringify!($field), "` as a typed quantity.")]
            #[must_use]
            pub fn $getter(&self) -> $quantity {
                ($make)(self.$group.$field)
            }

            #[doc = concat!("Sets `", stringify!($field), "` from a typed quantity.")]
            #[doc = ""]
            #[doc = "# Errors"]
            #[doc = ""]
            #[doc = "Returns an error, leaving the parameters unchanged, if the new value"]
            #[doc = "fails validation."]
            pub fn $setter(&mut self, value: $quantity) -> Result<(), ParameterError> {
                self.update(|p| p.$group.$field = value.value)
            }
        )*
    };
}

impl ActuatorParameters {
    /// Creates a parameter set, validating every value.
    ///
    /// # Errors
    ///
    /// Returns a [`ParameterError`] naming the first parameter that is out of
    /// its physical domain, or describing an inconsistency between parameters.
    pub fn new(
        name: impl Into<String>,
        mechanical: Mechanical,
        electrical: Electrical,
        limits: Limits,
        thermal: Option<Thermal>,
    ) -> Result<Self, ParameterError> {
        let params = Self {
            name: name.into(),
            mechanical,
            electrical,
            limits,
            thermal,
        };
        params.validate()?;

        debug!(
            actuator = %params.name,
            thermal = params.thermal.is_some(),
            "validated actuator parameters"
        );

        Ok(params)
    }

    fn validate(&self) -> Result<(), ParameterError> {
        if self.name.trim().is_empty() {
            return Err(ParameterError::EmptyName);
        }

        validate_mechanical(&self.mechanical)?;
        validate_electrical(&self.electrical)?;
        validate_limits(&self.limits)?;
        if let Some(thermal) = &self.thermal {
            validate_thermal(thermal)?;
        }

        Ok(())
    }

    /// Applies `edit` to a copy, keeping it only if the result is valid.
    fn update(&mut self, edit: impl FnOnce(&mut Self)) -> Result<(), ParameterError> {
        let mut candidate = self.clone();
        edit(&mut candidate);
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }

    /// Returns the actuator's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the mechanical parameters.
    #[must_use]
    pub fn mechanical(&self) -> &Mechanical {
        &self.mechanical
    }

    /// Returns the electrical parameters.
    #[must_use]
    pub fn electrical(&self) -> &Electrical {
        &self.electrical
    }

    /// Returns the operating limits.
    #[must_use]
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Returns the thermal model, if one was provided.
    #[must_use]
    pub fn thermal(&self) -> Option<&Thermal> {
        self.thermal.as_ref()
    }

    /// Returns a copy with a different spring stiffness.
    ///
    /// Used to sweep variable-stiffness actuators across their range.
    ///
    /// # Errors
    ///
    /// Returns an error if the stiffness is negative, non-finite, or outside
    /// the actuator's stiffness range.
    pub fn with_stiffness(&self, stiffness: f64) -> Result<Self, ParameterError> {
        let mut mechanical = self.mechanical;
        mechanical.spring_stiffness = stiffness;
        validate_mechanical(&mechanical)?;

        Ok(Self {
            mechanical,
            ..self.clone()
        })
    }

    /// Returns the symbol table used to substitute these parameters into
    /// symbolic dynamics.
    #[must_use]
    pub fn symbol_values(&self) -> SymbolTable {
        SymbolTable::from_parameters(self)
    }

    quantity_accessors! {
        mechanical.motor_inertia: MomentOfInertia = MomentOfInertia::new::<kilogram_square_meter>,
            motor_inertia, set_motor_inertia;
        mechanical.gear_inertia: MomentOfInertia = MomentOfInertia::new::<kilogram_square_meter>,
            gear_inertia, set_gear_inertia;
        mechanical.load_inertia: MomentOfInertia = MomentOfInertia::new::<kilogram_square_meter>,
            load_inertia, set_load_inertia;
        mechanical.spring_stiffness: TorsionalStiffness = torsional_stiffness_si,
            spring_stiffness, set_spring_stiffness;
        mechanical.spring_damping: RotationalDamping = rotational_damping_si,
            spring_damping, set_spring_damping;
        mechanical.motor_damping: RotationalDamping = rotational_damping_si,
            motor_damping, set_motor_damping;
        mechanical.load_damping: RotationalDamping = rotational_damping_si,
            load_damping, set_load_damping;
        electrical.torque_constant: TorqueConstant = torque_constant_si,
            torque_constant, set_torque_constant;
        electrical.back_emf_constant: BackEmfConstant = torque_constant_si,
            back_emf_constant, set_back_emf_constant;
        electrical.resistance: ElectricalResistance = ElectricalResistance::new::<ohm>,
            resistance, set_resistance;
        electrical.inductance: Inductance = Inductance::new::<henry>,
            inductance, set_inductance;
        limits.nominal_current: ElectricCurrent = ElectricCurrent::new::<ampere>,
            nominal_current, set_nominal_current;
        limits.peak_current: ElectricCurrent = ElectricCurrent::new::<ampere>,
            peak_current, set_peak_current;
        limits.max_voltage: ElectricPotential = ElectricPotential::new::<volt>,
            max_voltage, set_max_voltage;
        limits.max_motor_speed: AngularVelocity = AngularVelocity::new::<radian_per_second>,
            max_motor_speed, set_max_motor_speed;
        limits.max_torque: Torque = Torque::new::<newton_meter>,
            max_torque, set_max_torque;
    }

    /// Returns the winding temperature limit, if a thermal model is present.
    #[must_use]
    pub fn max_winding_temperature(&self) -> Option<ThermodynamicTemperature> {
        self.thermal
            .map(|t| ThermodynamicTemperature::new::<kelvin>(t.max_winding_temperature))
    }

    /// Returns the ambient temperature, if a thermal model is present.
    #[must_use]
    pub fn ambient_temperature(&self) -> Option<ThermodynamicTemperature> {
        self.thermal
            .map(|t| ThermodynamicTemperature::new::<kelvin>(t.ambient_temperature))
    }

    /// Sets the winding temperature limit.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no thermal model or the limit is not
    /// above ambient.
    pub fn set_max_winding_temperature(
        &mut self,
        value: ThermodynamicTemperature,
    ) -> Result<(), ParameterError> {
        let kelvins = value.get::<kelvin>();
        self.update_thermal(|t| t.max_winding_temperature = kelvins)
    }

    /// Sets the ambient temperature.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no thermal model or ambient is not below
    /// the winding limit.
    pub fn set_ambient_temperature(
        &mut self,
        value: ThermodynamicTemperature,
    ) -> Result<(), ParameterError> {
        let kelvins = value.get::<kelvin>();
        self.update_thermal(|t| t.ambient_temperature = kelvins)
    }

    fn update_thermal(&mut self, edit: impl FnOnce(&mut Thermal)) -> Result<(), ParameterError> {
        if self.thermal.is_none() {
            return Err(ParameterError::MissingThermalModel);
        }
        self.update(|p| {
            if let Some(thermal) = p.thermal.as_mut() {
                edit(thermal);
            }
        })
    }

    /// Returns the total thermal resistance from winding to ambient.
    #[must_use]
    pub fn total_thermal_resistance(&self) -> Option<ThermalResistance> {
        self.thermal
            .map(|t| thermal_resistance_si(t.resistance_winding + t.resistance_housing))
    }

    // --- Derived quantities ---

    /// Returns the motor and gearbox inertia reflected to the output, `(J_m + J_g)·N²`.
    #[must_use]
    pub fn reflected_motor_inertia(&self) -> MomentOfInertia {
        let m = &self.mechanical;
        MomentOfInertia::new::<kilogram_square_meter>(
            (m.motor_inertia + m.gear_inertia) * m.gear_ratio.powi(2),
        )
    }

    /// Returns the continuous output torque, `K_t·i_nom·N`.
    ///
    /// Not capped by `max_torque`, unlike [`peak_torque`](Self::peak_torque).
    #[must_use]
    pub fn continuous_torque(&self) -> Torque {
        Torque::new::<newton_meter>(
            self.electrical.torque_constant * self.limits.nominal_current * self.mechanical.gear_ratio,
        )
    }

    /// Returns the peak output torque, `K_t·i_peak·N`, capped by the torque limit.
    #[must_use]
    pub fn peak_torque(&self) -> Torque {
        let torque =
            self.electrical.torque_constant * self.limits.peak_current * self.mechanical.gear_ratio;
        Torque::new::<newton_meter>(torque.min(self.limits.max_torque))
    }

    /// Returns the maximum output speed, `ω_max / N`.
    #[must_use]
    pub fn max_output_speed(&self) -> AngularVelocity {
        AngularVelocity::new::<radian_per_second>(
            self.limits.max_motor_speed / self.mechanical.gear_ratio,
        )
    }

    /// Returns the current drawn at stall under full supply voltage, `U_max / R`.
    #[must_use]
    pub fn stall_current(&self) -> ElectricCurrent {
        ElectricCurrent::new::<ampere>(self.limits.max_voltage / self.electrical.resistance)
    }

    /// Returns the natural frequency of the spring and load with the motor locked, `√(k / J_l)`.
    #[must_use]
    pub fn natural_frequency(&self) -> AngularVelocity {
        let m = &self.mechanical;
        AngularVelocity::new::<radian_per_second>((m.spring_stiffness / m.load_inertia).sqrt())
    }

    /// Returns the steady-state winding temperature at a constant current.
    ///
    /// Copper losses `i²R` flow through both thermal resistances:
    /// `T = T_amb + i²R(R_th1 + R_th2)`.
    #[must_use]
    pub fn steady_state_winding_temperature(
        &self,
        current: ElectricCurrent,
    ) -> Option<ThermodynamicTemperature> {
        let thermal = self.thermal?;
        let i = current.get::<ampere>();
        let losses = i * i * self.electrical.resistance;
        let rise = losses * (thermal.resistance_winding + thermal.resistance_housing);

        Some(ThermodynamicTemperature::new::<kelvin>(
            thermal.ambient_temperature + rise,
        ))
    }

    /// Returns the largest constant current the winding can carry indefinitely.
    #[must_use]
    pub fn thermal_current_limit(&self) -> Option<ElectricCurrent> {
        let thermal = self.thermal?;
        let headroom = thermal.max_winding_temperature - thermal.ambient_temperature;
        let r_th = thermal.resistance_winding + thermal.resistance_housing;

        Some(ElectricCurrent::new::<ampere>(
            (headroom / (self.electrical.resistance * r_th)).sqrt(),
        ))
    }

    /// Returns how long a constant current takes to heat the winding from
    /// ambient to its temperature limit.
    ///
    /// The two thermal nodes are lumped into a single first-order system with
    /// time constant `τ_th1 + τ_th2`. Returns `None` when there is no thermal
    /// model or the steady-state temperature never reaches the limit.
    #[must_use]
    pub fn time_to_thermal_limit(&self, current: ElectricCurrent) -> Option<Time> {
        let thermal = self.thermal?;
        let steady = self.steady_state_winding_temperature(current)?.get::<kelvin>();

        let rise = steady - thermal.ambient_temperature;
        let allowed = thermal.max_winding_temperature - thermal.ambient_temperature;
        if rise <= allowed {
            return None;
        }

        let tau = thermal.time_constant_winding + thermal.time_constant_housing;
        Some(Time::new::<second>(-tau * (1.0 - allowed / rise).ln()))
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ParameterError> {
    StrictlyPositive::new(value)
        .map(|_| ())
        .map_err(|source| ParameterError::Invalid { name, source })
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ParameterError> {
    NonNegative::new(value)
        .map(|_| ())
        .map_err(|source| ParameterError::Invalid { name, source })
}

fn validate_mechanical(m: &Mechanical) -> Result<(), ParameterError> {
    check_positive("motor_inertia", m.motor_inertia)?;
    check_positive("gear_inertia", m.gear_inertia)?;
    check_positive("load_inertia", m.load_inertia)?;
    check_positive("gear_ratio", m.gear_ratio)?;
    check_non_negative("spring_stiffness", m.spring_stiffness)?;
    check_non_negative("spring_damping", m.spring_damping)?;
    check_non_negative("motor_damping", m.motor_damping)?;
    check_non_negative("load_damping", m.load_damping)?;

    if let Some((min, max)) = m.stiffness_range {
        check_non_negative("stiffness_range.min", min)?;
        check_non_negative("stiffness_range.max", max)?;
        if min > max {
            return Err(ParameterError::InvalidStiffnessRange { min, max });
        }
        if !(min..=max).contains(&m.spring_stiffness) {
            return Err(ParameterError::StiffnessOutOfRange {
                stiffness: m.spring_stiffness,
                min,
                max,
            });
        }
    }

    Ok(())
}

fn validate_electrical(e: &Electrical) -> Result<(), ParameterError> {
    check_positive("torque_constant", e.torque_constant)?;
    check_positive("back_emf_constant", e.back_emf_constant)?;
    check_positive("resistance", e.resistance)?;
    check_non_negative("inductance", e.inductance)
}

fn validate_limits(l: &Limits) -> Result<(), ParameterError> {
    check_positive("nominal_current", l.nominal_current)?;
    check_positive("peak_current", l.peak_current)?;
    check_positive("max_voltage", l.max_voltage)?;
    check_positive("max_motor_speed", l.max_motor_speed)?;
    check_positive("max_torque", l.max_torque)?;

    if l.peak_current < l.nominal_current {
        return Err(ParameterError::PeakBelowNominal {
            peak: l.peak_current,
            nominal: l.nominal_current,
        });
    }

    Ok(())
}

fn validate_thermal(t: &Thermal) -> Result<(), ParameterError> {
    check_positive("thermal.resistance_winding", t.resistance_winding)?;
    check_positive("thermal.resistance_housing", t.resistance_housing)?;
    check_positive("thermal.time_constant_winding", t.time_constant_winding)?;
    check_positive("thermal.time_constant_housing", t.time_constant_housing)?;
    check_positive("thermal.max_winding_temperature", t.max_winding_temperature)?;
    check_positive("thermal.ambient_temperature", t.ambient_temperature)?;

    if t.max_winding_temperature <= t.ambient_temperature {
        return Err(ParameterError::ThermalLimitBelowAmbient {
            max: t.max_winding_temperature,
            ambient: t.ambient_temperature,
        });
    }

    Ok(())
}

/// Serialized form of [`ActuatorParameters`], validated on conversion.
#[cfg(feature = "serde-derive")]
#[derive(serde::Serialize, serde::Deserialize)]
struct Unchecked {
    name: String,
    mechanical: Mechanical,
    electrical: Electrical,
    limits: Limits,
    #[serde(default)]
    thermal: Option<Thermal>,
}

#[cfg(feature = "serde-derive")]
impl TryFrom<Unchecked> for ActuatorParameters {
    type Error = ParameterError;

    fn try_from(raw: Unchecked) -> Result<Self, Self::Error> {
        Self::new(
            raw.name,
            raw.mechanical,
            raw.electrical,
            raw.limits,
            raw.thermal,
        )
    }
}

#[cfg(feature = "serde-derive")]
impl From<ActuatorParameters> for Unchecked {
    fn from(params: ActuatorParameters) -> Self {
        Self {
            name: params.name,
            mechanical: params.mechanical,
            electrical: params.electrical,
            limits: params.limits,
            thermal: params.thermal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{constraint::ConstraintError, presets};

    #[test]
    fn preset_is_valid_and_named() {
        let params = presets::harmonic_drive_sea();
        assert_eq!(params.name(), "harmonic-drive-sea");
        assert!(params.thermal().is_some());
    }

    #[test]
    fn rejects_empty_name() {
        let p = presets::harmonic_drive_sea();
        let result = ActuatorParameters::new(
            "  ",
            *p.mechanical(),
            *p.electrical(),
            *p.limits(),
            None,
        );
        assert_eq!(result, Err(ParameterError::EmptyName));
    }

    #[test]
    fn rejects_zero_inertia() {
        let p = presets::harmonic_drive_sea();
        let mechanical = Mechanical {
            load_inertia: 0.0,
            ..*p.mechanical()
        };

        let result =
            ActuatorParameters::new("bad", mechanical, *p.electrical(), *p.limits(), None);

        assert_eq!(
            result,
            Err(ParameterError::Invalid {
                name: "load_inertia",
                source: ConstraintError::Zero,
            })
        );
    }

    #[test]
    fn rejects_negative_damping() {
        let p = presets::harmonic_drive_sea();
        let mechanical = Mechanical {
            motor_damping: -0.1,
            ..*p.mechanical()
        };

        let err = ActuatorParameters::new("bad", mechanical, *p.electrical(), *p.limits(), None)
            .unwrap_err();
        assert!(err.to_string().contains("motor_damping"));
    }

    #[test]
    fn rejects_peak_below_nominal() {
        let p = presets::harmonic_drive_sea();
        let limits = Limits {
            peak_current: 1.0,
            nominal_current: 2.0,
            ..*p.limits()
        };

        let result = ActuatorParameters::new("bad", *p.mechanical(), *p.electrical(), limits, None);
        assert_eq!(
            result,
            Err(ParameterError::PeakBelowNominal {
                peak: 1.0,
                nominal: 2.0
            })
        );
    }

    #[test]
    fn stiffness_range_is_enforced() {
        let params = presets::variable_stiffness_joint();
        let (min, max) = params.mechanical().stiffness_range.unwrap();

        let softer = params.with_stiffness(min).unwrap();
        assert_relative_eq!(softer.mechanical().spring_stiffness, min);

        let err = params.with_stiffness(max * 2.0).unwrap_err();
        assert!(matches!(err, ParameterError::StiffnessOutOfRange { .. }));
    }

    #[test]
    fn thermal_limit_must_exceed_ambient() {
        let p = presets::harmonic_drive_sea();
        let thermal = Thermal {
            max_winding_temperature: 290.0,
            ..*p.thermal().unwrap()
        };

        let result = ActuatorParameters::new(
            "hot",
            *p.mechanical(),
            *p.electrical(),
            *p.limits(),
            Some(thermal),
        );
        assert!(matches!(
            result,
            Err(ParameterError::ThermalLimitBelowAmbient { .. })
        ));
    }

    #[test]
    fn derived_mechanical_quantities() {
        let params = presets::harmonic_drive_sea();
        let m = params.mechanical();

        let expected = (m.motor_inertia + m.gear_inertia) * m.gear_ratio * m.gear_ratio;
        assert_relative_eq!(
            params
                .reflected_motor_inertia()
                .get::<kilogram_square_meter>(),
            expected
        );

        let wn = params.natural_frequency().get::<radian_per_second>();
        assert_relative_eq!(wn * wn * m.load_inertia, m.spring_stiffness, epsilon = 1e-9);

        assert_relative_eq!(
            params.max_output_speed().get::<radian_per_second>(),
            params.limits().max_motor_speed / m.gear_ratio
        );
    }

    #[test]
    fn only_peak_torque_is_capped() {
        let p = presets::harmonic_drive_sea();
        let limits = Limits {
            nominal_current: 10.0,
            peak_current: 10.0,
            max_torque: 20.0,
            ..*p.limits()
        };
        let params =
            ActuatorParameters::new("strong", *p.mechanical(), *p.electrical(), limits, None)
                .unwrap();

        let rated = p.electrical().torque_constant * 10.0 * p.mechanical().gear_ratio;
        assert!(rated > 20.0);
        assert_relative_eq!(params.continuous_torque().get::<newton_meter>(), rated);
        assert_relative_eq!(params.peak_torque().get::<newton_meter>(), 20.0);
    }

    #[test]
    fn stall_current_is_supply_over_resistance() {
        let params = presets::harmonic_drive_sea();
        assert_relative_eq!(
            params.stall_current().get::<ampere>(),
            24.0 / 0.608,
            max_relative = 1e-12
        );
    }

    #[test]
    fn rejects_zero_gear_inertia() {
        let p = presets::harmonic_drive_sea();
        let mechanical = Mechanical {
            gear_inertia: 0.0,
            ..*p.mechanical()
        };

        let result =
            ActuatorParameters::new("bad", mechanical, *p.electrical(), *p.limits(), None);
        assert_eq!(
            result,
            Err(ParameterError::Invalid {
                name: "gear_inertia",
                source: ConstraintError::Zero,
            })
        );
    }

    #[test]
    fn rejects_reversed_stiffness_range() {
        let p = presets::variable_stiffness_joint();
        let mechanical = Mechanical {
            stiffness_range: Some((500.0, 20.0)),
            ..*p.mechanical()
        };

        let result =
            ActuatorParameters::new("bad", mechanical, *p.electrical(), *p.limits(), None);
        assert_eq!(
            result,
            Err(ParameterError::InvalidStiffnessRange {
                min: 500.0,
                max: 20.0
            })
        );
    }

    #[test]
    fn time_to_thermal_limit_follows_first_order_heating() {
        let params = presets::harmonic_drive_sea();
        let current = ElectricCurrent::new::<ampere>(8.0);

        // i²R(R_th1 + R_th2) with τ = τ_th1 + τ_th2.
        let rise: f64 = 64.0 * 0.608 * (2.5 + 4.0);
        let allowed = 398.15 - 298.15;
        let tau = 30.0 + 1500.0;
        let expected = -tau * (1.0 - allowed / rise).ln();

        let time = params.time_to_thermal_limit(current).unwrap();
        assert_relative_eq!(time.get::<second>(), expected, max_relative = 1e-12);

        // 3 A settles at about 35 K above ambient.
        assert!(
            params
                .time_to_thermal_limit(ElectricCurrent::new::<ampere>(3.0))
                .is_none()
        );
    }

    #[test]
    fn typed_setters_revalidate() {
        let mut params = presets::harmonic_drive_sea();

        params
            .set_load_inertia(MomentOfInertia::new::<kilogram_square_meter>(0.2))
            .unwrap();
        assert_relative_eq!(params.mechanical().load_inertia, 0.2);

        let before = params.clone();
        let err = params
            .set_peak_current(ElectricCurrent::new::<ampere>(1.0))
            .unwrap_err();
        assert!(matches!(err, ParameterError::PeakBelowNominal { .. }));
        assert_eq!(params, before);

        let err = params
            .set_gear_inertia(MomentOfInertia::new::<kilogram_square_meter>(-1.0))
            .unwrap_err();
        assert!(err.to_string().contains("gear_inertia"));
        assert_eq!(params, before);
    }

    #[test]
    fn thermal_setters_need_a_thermal_model() {
        let p = presets::variable_stiffness_joint();
        let mut params = p.clone();
        assert!(params.ambient_temperature().is_none());

        let err = params
            .set_ambient_temperature(ThermodynamicTemperature::new::<kelvin>(300.0))
            .unwrap_err();
        assert_eq!(err, ParameterError::MissingThermalModel);
        assert_eq!(params, p);

        let mut hot = presets::harmonic_drive_sea();
        let err = hot
            .set_ambient_temperature(ThermodynamicTemperature::new::<kelvin>(400.0))
            .unwrap_err();
        assert!(matches!(err, ParameterError::ThermalLimitBelowAmbient { .. }));

        hot.set_max_winding_temperature(ThermodynamicTemperature::new::<kelvin>(420.0))
            .unwrap();
        assert_relative_eq!(
            hot.max_winding_temperature().unwrap().get::<kelvin>(),
            420.0
        );
    }

    #[test]
    fn thermal_current_limit_reaches_max_temperature() {
        let params = presets::harmonic_drive_sea();
        let limit = params.thermal_current_limit().unwrap();
        let temperature = params.steady_state_winding_temperature(limit).unwrap();

        assert_relative_eq!(
            temperature.get::<kelvin>(),
            params.thermal().unwrap().max_winding_temperature,
            epsilon = 1e-9
        );

        // Below the limit the winding never overheats.
        assert!(params.time_to_thermal_limit(limit * 0.9).is_none());

        // Above it the time to overheat shrinks as current grows.
        let t_low = params.time_to_thermal_limit(limit * 1.5).unwrap();
        let t_high = params.time_to_thermal_limit(limit * 3.0).unwrap();
        assert!(t_high < t_low);
        assert!(t_high.get::<second>() > 0.0);
    }

    #[test]
    fn thermal_queries_need_a_thermal_model() {
        let p = presets::harmonic_drive_sea();
        let params =
            ActuatorParameters::new("cold", *p.mechanical(), *p.electrical(), *p.limits(), None)
                .unwrap();

        assert!(params.thermal_current_limit().is_none());
        assert!(params.total_thermal_resistance().is_none());
        assert!(
            params
                .steady_state_winding_temperature(ElectricCurrent::new::<ampere>(1.0))
                .is_none()
        );
    }
}
