use thiserror::Error;

use crate::constraint::ConstraintError;

/// Errors that may occur when validating an actuator parameter set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    /// The actuator name is empty or only whitespace.
    #[error("actuator name must not be empty")]
    EmptyName,

    /// A single parameter lies outside its physical domain.
    #[error("parameter `{name}` is invalid: {source}")]
    Invalid {
        name: &'static str,
        #[source]
        source: ConstraintError,
    },

    /// The peak current rating is lower than the continuous rating.
    #[error("peak current {peak} A is below nominal current {nominal} A")]
    PeakBelowNominal { peak: f64, nominal: f64 },

    /// The stiffness range has its bounds reversed.
    #[error("stiffness range [{min}, {max}] N·m/rad is reversed")]
    InvalidStiffnessRange { min: f64, max: f64 },

    /// The spring stiffness lies outside the declared stiffness range.
    #[error("spring stiffness {stiffness} N·m/rad lies outside [{min}, {max}]")]
    StiffnessOutOfRange { stiffness: f64, min: f64, max: f64 },

    /// A thermal quantity was set on a parameter set with no thermal model.
    #[error("actuator has no thermal model")]
    MissingThermalModel,

    /// The winding temperature limit is not above ambient.
    #[error("maximum winding temperature {max} K must exceed ambient temperature {ambient} K")]
    ThermalLimitBelowAmbient { max: f64, ambient: f64 },
}
