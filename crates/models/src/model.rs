use std::collections::BTreeSet;

use actuate_core::ActuatorParameters;
use actuate_lti::{
    Complex, DiscreteStateSpace, Discretization, StateSpace, TransferFunction,
};
use actuate_symbolic::{Substitution, SymbolicStateSpace};
use tracing::debug;

use crate::ModelError;

/// Selects a state, input or output by position or by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port<'a> {
    Index(usize),
    Name(&'a str),
}

impl From<usize> for Port<'_> {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl<'a> From<&'a str> for Port<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl Port<'_> {
    fn resolve(self, kind: &'static str, names: &[String]) -> Result<usize, ModelError> {
        match self {
            Self::Index(index) => Ok(index),
            Self::Name(name) => names.iter().position(|n| n == name).ok_or_else(|| {
                ModelError::UnknownSignal {
                    kind,
                    name: name.to_owned(),
                }
            }),
        }
    }
}

/// A compliant actuator described by a parameter set and symbolic dynamics.
///
/// Implementors supply the parameters and the family's linear dynamics in
/// terms of the parameter symbols (see
/// [`actuate_core::parameters::names`]). Every numeric representation is
/// derived from those two by substitution.
pub trait ActuatorModel {
    /// Returns the actuator's parameter set.
    fn parameters(&self) -> &ActuatorParameters;

    /// Returns the linear dynamics with parameters as symbols.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbolic system cannot be assembled.
    fn symbolic_state_space(&self) -> Result<SymbolicStateSpace, ModelError>;

    /// Returns the parameter values keyed by symbol name.
    fn substitution(&self) -> Substitution {
        self.parameters().symbol_values().iter().collect()
    }

    /// Returns symbols in the symbolic state-space that the parameter set
    /// does not bind.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbolic system cannot be assembled.
    fn unbound_symbols(&self) -> Result<Vec<String>, ModelError> {
        let values = self.substitution();
        Ok(unbound(self.symbolic_state_space()?.symbols(), &values))
    }

    /// Returns the continuous state-space with parameter values substituted.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnboundSymbols`] if the parameter set leaves a
    /// symbol free, or an error from evaluating the matrices.
    fn state_space(&self) -> Result<StateSpace, ModelError> {
        let symbolic = self.symbolic_state_space()?;
        let values = self.substitution();
        ensure_bound(symbolic.symbols(), &values)?;

        debug!(
            actuator = self.parameters().name(),
            n_states = symbolic.n_states(),
            "deriving state-space"
        );

        Ok(symbolic.substitute(&values)?)
    }

    /// Returns the state-space discretized with sample time `dt`.
    ///
    /// # Errors
    ///
    /// Returns an error if the state-space cannot be derived or the
    /// discretization fails.
    fn discrete_state_space(
        &self,
        dt: f64,
        method: Discretization,
    ) -> Result<DiscreteStateSpace, ModelError> {
        Ok(self.state_space()?.discretize(dt, method)?)
    }

    /// Returns the transfer function between an input and an output.
    ///
    /// Either may be given by index or by name.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownSignal`] for an unknown name, or an error
    /// if the state-space cannot be derived or an index is out of range.
    fn transfer_function<'a>(
        &self,
        input: impl Into<Port<'a>>,
        output: impl Into<Port<'a>>,
    ) -> Result<TransferFunction, ModelError> {
        let symbolic = self.symbolic_state_space()?;
        let input = input.into().resolve("input", symbolic.inputs())?;
        let output = output.into().resolve("output", symbolic.outputs())?;
        Ok(self.state_space()?.transfer_function(input, output)?)
    }

    /// Returns the pulse transfer function of the discretized system.
    ///
    /// # Errors
    ///
    /// As for [`transfer_function`](Self::transfer_function) and
    /// [`discrete_state_space`](Self::discrete_state_space).
    fn discrete_transfer_function<'a>(
        &self,
        dt: f64,
        method: Discretization,
        input: impl Into<Port<'a>>,
        output: impl Into<Port<'a>>,
    ) -> Result<TransferFunction, ModelError> {
        let symbolic = self.symbolic_state_space()?;
        let input = input.into().resolve("input", symbolic.inputs())?;
        let output = output.into().resolve("output", symbolic.outputs())?;
        Ok(self
            .discrete_state_space(dt, method)?
            .transfer_function(input, output)?)
    }

    /// Returns every transfer function, indexed `[output][input]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the state-space cannot be derived.
    fn transfer_matrix(&self) -> Result<Vec<Vec<TransferFunction>>, ModelError> {
        Ok(self.state_space()?.transfer_matrix()?)
    }

    /// Returns the frequency response between an input and an output at `omega`.
    ///
    /// # Errors
    ///
    /// As for [`transfer_function`](Self::transfer_function), and if `jω`
    /// is a pole.
    fn frequency_response<'a>(
        &self,
        input: impl Into<Port<'a>>,
        output: impl Into<Port<'a>>,
        omega: f64,
    ) -> Result<Complex<f64>, ModelError> {
        let symbolic = self.symbolic_state_space()?;
        let input = input.into().resolve("input", symbolic.inputs())?;
        let output = output.into().resolve("output", symbolic.outputs())?;
        Ok(self
            .state_space()?
            .frequency_response(input, output, omega)?)
    }

    /// Returns the poles of the linear dynamics.
    ///
    /// # Errors
    ///
    /// Returns an error if the state-space cannot be derived.
    fn poles(&self) -> Result<Vec<Complex<f64>>, ModelError> {
        Ok(self.state_space()?.poles())
    }

    /// Returns `true` if every pole lies in the open left half-plane.
    ///
    /// # Errors
    ///
    /// Returns an error if the state-space cannot be derived.
    fn is_stable(&self) -> Result<bool, ModelError> {
        Ok(self.state_space()?.is_stable())
    }

    /// # Errors
    ///
    /// Returns an error if the symbolic system cannot be assembled.
    fn state_names(&self) -> Result<Vec<String>, ModelError> {
        Ok(self.symbolic_state_space()?.states().to_vec())
    }

    /// # Errors
    ///
    /// Returns an error if the symbolic system cannot be assembled.
    fn input_names(&self) -> Result<Vec<String>, ModelError> {
        Ok(self.symbolic_state_space()?.inputs().to_vec())
    }

    /// # Errors
    ///
    /// Returns an error if the symbolic system cannot be assembled.
    fn output_names(&self) -> Result<Vec<String>, ModelError> {
        Ok(self.symbolic_state_space()?.outputs().to_vec())
    }
}

fn unbound(symbols: BTreeSet<String>, values: &Substitution) -> Vec<String> {
    symbols
        .into_iter()
        .filter(|name| !values.contains(name))
        .collect()
}

/// Fails with [`ModelError::UnboundSymbols`] if any symbol lacks a binding.
pub(crate) fn ensure_bound(
    symbols: BTreeSet<String>,
    values: &Substitution,
) -> Result<(), ModelError> {
    let missing = unbound(symbols, values);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ModelError::UnboundSymbols(missing))
    }
}
