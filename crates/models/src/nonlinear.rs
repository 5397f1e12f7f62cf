use actuate_core::{ActuatorParameters, Observer};
use actuate_lti::{DVector, StateSpace};
use actuate_symbolic::{OperatingPoint, SymbolicDynamics, SymbolicStateSpace};

use crate::{
    ActuatorModel, ModelError,
    model::ensure_bound,
    simulate::{self, Action, Config, Event, Solution},
};

/// The physical quantity an input represents, used to saturate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub enum InputKind {
    /// Terminal voltage, limited to `±U_max`.
    Voltage,
    /// Winding current, limited to `±i_peak`.
    Current,
    /// Output torque, limited to `±tau_max`.
    Torque,
    /// Not limited.
    #[default]
    Other,
}

impl InputKind {
    /// Returns the magnitude limit for this kind of input, if any.
    #[must_use]
    pub fn limit(self, params: &ActuatorParameters) -> Option<f64> {
        let limits = params.limits();
        match self {
            Self::Voltage => Some(limits.max_voltage),
            Self::Current => Some(limits.peak_current),
            Self::Torque => Some(limits.max_torque),
            Self::Other => None,
        }
    }

    /// Clamps `value` to the limit for this kind of input.
    #[must_use]
    pub fn saturate(self, value: f64, params: &ActuatorParameters) -> f64 {
        match self.limit(params) {
            Some(limit) => value.clamp(-limit, limit),
            None => value,
        }
    }
}

/// An actuator model with nonlinear dynamics `ẋ = f(x, u)`, `y = h(x, u)`.
///
/// The dynamics use the same parameter symbols as the linear model. States
/// and inputs appear as symbols named after them.
pub trait NonlinearActuatorModel: ActuatorModel {
    /// Returns the nonlinear dynamics with parameters as symbols.
    ///
    /// # Errors
    ///
    /// Returns an error if the dynamics cannot be assembled.
    fn symbolic_dynamics(&self) -> Result<SymbolicDynamics, ModelError>;

    /// Returns the kind of each input, in input order.
    ///
    /// Defaults to [`InputKind::Other`] for every input.
    ///
    /// # Errors
    ///
    /// Returns an error if the dynamics cannot be assembled.
    fn input_kinds(&self) -> Result<Vec<InputKind>, ModelError> {
        Ok(vec![InputKind::Other; self.symbolic_dynamics()?.n_inputs()])
    }

    /// Returns the dynamics with every parameter substituted.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnboundSymbols`] if a parameter symbol has no
    /// value.
    fn bound_dynamics(&self) -> Result<SymbolicDynamics, ModelError> {
        let bound = self.symbolic_dynamics()?.bind(&self.substitution());
        let unbound = bound.parameter_symbols();
        if unbound.is_empty() {
            Ok(bound)
        } else {
            Err(ModelError::UnboundSymbols(unbound.into_iter().collect()))
        }
    }

    /// Returns the linearization about `point` with parameters kept symbolic.
    ///
    /// # Errors
    ///
    /// Returns an error if the dynamics cannot be assembled or the point has
    /// the wrong dimensions.
    fn symbolic_linearization(
        &self,
        point: &OperatingPoint,
    ) -> Result<SymbolicStateSpace, ModelError> {
        Ok(self.symbolic_dynamics()?.linearize(point)?)
    }

    /// Returns the numeric linearization about `point`.
    ///
    /// # Errors
    ///
    /// As for [`symbolic_linearization`](Self::symbolic_linearization), and
    /// [`ModelError::UnboundSymbols`] if a parameter has no value.
    fn linearize(&self, point: &OperatingPoint) -> Result<StateSpace, ModelError> {
        let symbolic = self.symbolic_linearization(point)?;
        let values = self.substitution();
        ensure_bound(symbolic.symbols(), &values)?;
        Ok(symbolic.substitute(&values)?)
    }

    /// Evaluates `f(x, u)`.
    ///
    /// # Errors
    ///
    /// Returns an error if a vector has the wrong length or an equation
    /// cannot be evaluated.
    fn derivative(&self, x: &DVector<f64>, u: &DVector<f64>) -> Result<DVector<f64>, ModelError> {
        Ok(self
            .symbolic_dynamics()?
            .derivative(x, u, &self.substitution())?)
    }

    /// Evaluates `h(x, u)`.
    ///
    /// # Errors
    ///
    /// Returns an error if a vector has the wrong length or an equation
    /// cannot be evaluated.
    fn output(&self, x: &DVector<f64>, u: &DVector<f64>) -> Result<DVector<f64>, ModelError> {
        Ok(self
            .symbolic_dynamics()?
            .output(x, u, &self.substitution())?)
    }

    /// Simulates the nonlinear dynamics from `initial_state`.
    ///
    /// See [`simulate::solve`].
    ///
    /// # Errors
    ///
    /// Returns an error if the dynamics cannot be evaluated, the input
    /// signal has the wrong length, or the state diverges.
    fn simulate<U, O>(
        &self,
        initial_state: DVector<f64>,
        input: U,
        config: &Config,
        observer: O,
    ) -> Result<Solution, simulate::Error>
    where
        U: Fn(f64) -> DVector<f64>,
        O: Observer<Event, Action>,
    {
        simulate::solve(self, initial_state, input, config, observer)
    }
}
