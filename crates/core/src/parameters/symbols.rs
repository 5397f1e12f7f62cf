use std::collections::{BTreeMap, btree_map};

use super::ActuatorParameters;

/// Symbol names under which parameters appear in symbolic dynamics.
pub mod names {
    pub const MOTOR_INERTIA: &str = "J_m";
    pub const GEAR_INERTIA: &str = "J_g";
    pub const LOAD_INERTIA: &str = "J_l";
    pub const GEAR_RATIO: &str = "N";
    pub const SPRING_STIFFNESS: &str = "k";
    pub const STIFFNESS_MIN: &str = "k_min";
    pub const STIFFNESS_MAX: &str = "k_max";
    pub const SPRING_DAMPING: &str = "d_s";
    pub const MOTOR_DAMPING: &str = "d_m";
    pub const LOAD_DAMPING: &str = "d_l";
    pub const TORQUE_CONSTANT: &str = "K_t";
    pub const BACK_EMF_CONSTANT: &str = "K_e";
    pub const RESISTANCE: &str = "R";
    pub const INDUCTANCE: &str = "L";
    pub const NOMINAL_CURRENT: &str = "i_nom";
    pub const PEAK_CURRENT: &str = "i_peak";
    pub const MAX_VOLTAGE: &str = "U_max";
    pub const MAX_MOTOR_SPEED: &str = "dq_max";
    pub const MAX_TORQUE: &str = "tau_max";
    pub const THERMAL_RESISTANCE_WINDING: &str = "R_th1";
    pub const THERMAL_RESISTANCE_HOUSING: &str = "R_th2";
    pub const THERMAL_TIME_CONSTANT_WINDING: &str = "tau_th1";
    pub const THERMAL_TIME_CONSTANT_HOUSING: &str = "tau_th2";
    pub const MAX_WINDING_TEMPERATURE: &str = "T_max";
    pub const AMBIENT_TEMPERATURE: &str = "T_amb";
}

/// Values keyed by symbol name, ordered by name.
///
/// Built from an [`ActuatorParameters`] with
/// [`symbol_values`](ActuatorParameters::symbol_values), then optionally
/// extended with extra symbols such as operating-point values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    values: BTreeMap<String, f64>,
}

impl SymbolTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn from_parameters(params: &ActuatorParameters) -> Self {
        use names::*;

        let m = &params.mechanical;
        let e = &params.electrical;
        let l = &params.limits;

        let mut table = Self::new();
        table.insert(MOTOR_INERTIA, m.motor_inertia);
        table.insert(GEAR_INERTIA, m.gear_inertia);
        table.insert(LOAD_INERTIA, m.load_inertia);
        table.insert(GEAR_RATIO, m.gear_ratio);
        table.insert(SPRING_STIFFNESS, m.spring_stiffness);
        table.insert(SPRING_DAMPING, m.spring_damping);
        table.insert(MOTOR_DAMPING, m.motor_damping);
        table.insert(LOAD_DAMPING, m.load_damping);
        if let Some((min, max)) = m.stiffness_range {
            table.insert(STIFFNESS_MIN, min);
            table.insert(STIFFNESS_MAX, max);
        }

        table.insert(TORQUE_CONSTANT, e.torque_constant);
        table.insert(BACK_EMF_CONSTANT, e.back_emf_constant);
        table.insert(RESISTANCE, e.resistance);
        table.insert(INDUCTANCE, e.inductance);

        table.insert(NOMINAL_CURRENT, l.nominal_current);
        table.insert(PEAK_CURRENT, l.peak_current);
        table.insert(MAX_VOLTAGE, l.max_voltage);
        table.insert(MAX_MOTOR_SPEED, l.max_motor_speed);
        table.insert(MAX_TORQUE, l.max_torque);

        if let Some(t) = &params.thermal {
            table.insert(THERMAL_RESISTANCE_WINDING, t.resistance_winding);
            table.insert(THERMAL_RESISTANCE_HOUSING, t.resistance_housing);
            table.insert(THERMAL_TIME_CONSTANT_WINDING, t.time_constant_winding);
            table.insert(THERMAL_TIME_CONSTANT_HOUSING, t.time_constant_housing);
            table.insert(MAX_WINDING_TEMPERATURE, t.max_winding_temperature);
            table.insert(AMBIENT_TEMPERATURE, t.ambient_temperature);
        }

        table
    }

    /// Inserts or replaces a value, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(name.into(), value)
    }

    /// Returns the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Returns `true` if `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the number of bound symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no symbols are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl<'a> IntoIterator for &'a SymbolTable {
    type Item = (&'a String, &'a f64);
    type IntoIter = btree_map::Iter<'a, String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<S: Into<String>> Extend<(S, f64)> for SymbolTable {
    fn extend<I: IntoIterator<Item = (S, f64)>>(&mut self, iter: I) {
        self.values
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v)));
    }
}

#[cfg(test)]
mod tests {
    use super::{names::*, *};

    use crate::presets;

    #[test]
    fn table_covers_every_parameter() {
        let params = presets::harmonic_drive_sea();
        let table = params.symbol_values();

        assert_eq!(table.get(SPRING_STIFFNESS), Some(params.mechanical().spring_stiffness));
        assert_eq!(table.get(TORQUE_CONSTANT), Some(params.electrical().torque_constant));
        assert_eq!(table.get(MAX_VOLTAGE), Some(params.limits().max_voltage));
        assert!(table.contains(AMBIENT_TEMPERATURE));

        // No stiffness range on a fixed-stiffness actuator.
        assert!(!table.contains(STIFFNESS_MIN));
        assert_eq!(table.len(), 23);
    }

    #[test]
    fn variable_stiffness_adds_range_symbols() {
        let params = presets::variable_stiffness_joint();
        let table = params.symbol_values();

        assert!(table.contains(STIFFNESS_MIN));
        assert!(table.contains(STIFFNESS_MAX));
    }

    #[test]
    fn tables_extend_with_extra_symbols() {
        let mut table: SymbolTable = [("x", 1.0), ("y", 2.0)].into_iter().collect();
        table.extend([("z", 3.0)]);
        assert_eq!(table.insert("x", 4.0), Some(1.0));

        let names: Vec<_> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["x", "y", "z"]);
    }
}
