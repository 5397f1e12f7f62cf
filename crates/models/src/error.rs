use actuate_core::ParameterError;
use actuate_lti::LtiError;
use actuate_symbolic::SymbolicError;
use thiserror::Error;

/// Errors that may occur when deriving representations from an actuator model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error(transparent)]
    Parameters(#[from] ParameterError),

    #[error(transparent)]
    Symbolic(#[from] SymbolicError),

    #[error(transparent)]
    Lti(#[from] LtiError),

    /// The model's equations use symbols the parameter set does not supply.
    #[error("parameter set does not bind: {}", .0.join(", "))]
    UnboundSymbols(Vec<String>),

    /// A state, input or output was requested by a name the model lacks.
    #[error("model has no {kind} named `{name}`")]
    UnknownSignal { kind: &'static str, name: String },
}
