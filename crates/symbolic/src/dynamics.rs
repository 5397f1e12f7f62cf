use std::collections::{BTreeSet, HashSet};

use nalgebra::DVector;
use tracing::debug;

use crate::{Expr, Substitution, SymbolicError, SymbolicMatrix, SymbolicStateSpace};

/// State and input values about which dynamics are linearized.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatingPoint {
    pub states: Vec<f64>,
    pub inputs: Vec<f64>,
}

impl OperatingPoint {
    #[must_use]
    pub fn new(states: Vec<f64>, inputs: Vec<f64>) -> Self {
        Self { states, inputs }
    }

    /// The point with every state and input at zero.
    #[must_use]
    pub fn origin(n_states: usize, n_inputs: usize) -> Self {
        Self::new(vec![0.0; n_states], vec![0.0; n_inputs])
    }
}

/// Nonlinear dynamics `ẋ = f(x, u)`, `y = h(x, u)` in symbolic form.
///
/// State and input names are symbols in `f` and `h`; every other symbol is a
/// parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolicDynamics {
    states: Vec<String>,
    inputs: Vec<String>,
    outputs: Vec<String>,
    f: Vec<Expr>,
    h: Vec<Expr>,
}

impl SymbolicDynamics {
    /// Creates nonlinear dynamics.
    ///
    /// # Errors
    ///
    /// Returns [`SymbolicError::NameCount`] if `f` does not have one entry
    /// per state or `h` one entry per output, and
    /// [`SymbolicError::DuplicateName`] if a state or input name repeats.
    pub fn new<S: AsRef<str>>(
        states: &[S],
        inputs: &[S],
        outputs: &[S],
        f: Vec<Expr>,
        h: Vec<Expr>,
    ) -> Result<Self, SymbolicError> {
        let mut seen = HashSet::new();
        for name in states.iter().chain(inputs) {
            let name = name.as_ref();
            if !seen.insert(name) {
                return Err(SymbolicError::DuplicateName(name.to_owned()));
            }
        }

        let mut seen_outputs = HashSet::new();
        for name in outputs {
            let name = name.as_ref();
            if !seen_outputs.insert(name) {
                return Err(SymbolicError::DuplicateName(name.to_owned()));
            }
        }

        check_count("state", states.len(), f.len())?;
        check_count("output", outputs.len(), h.len())?;

        let owned = |names: &[S]| -> Vec<String> {
            names.iter().map(|n| n.as_ref().to_owned()).collect()
        };
        Ok(Self {
            states: owned(states),
            inputs: owned(inputs),
            outputs: owned(outputs),
            f,
            h,
        })
    }

    #[must_use]
    pub fn states(&self) -> &[String] {
        &self.states
    }

    #[must_use]
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    #[must_use]
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// Returns the state equations `f`.
    #[must_use]
    pub fn f(&self) -> &[Expr] {
        &self.f
    }

    /// Returns the output equations `h`.
    #[must_use]
    pub fn h(&self) -> &[Expr] {
        &self.h
    }

    #[must_use]
    pub fn n_states(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn n_inputs(&self) -> usize {
        self.inputs.len()
    }

    #[must_use]
    pub fn n_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Returns the symbols that are neither states nor inputs.
    #[must_use]
    pub fn parameter_symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        for expr in self.f.iter().chain(&self.h) {
            expr.collect_symbols(&mut out);
        }
        for name in self.states.iter().chain(&self.inputs) {
            out.remove(name);
        }
        out
    }

    /// Substitutes bound parameters, keeping states and inputs symbolic.
    ///
    /// Bindings for state or input names are ignored.
    #[must_use]
    pub fn bind(&self, values: &Substitution) -> Self {
        let mut params = values.clone();
        for name in self.states.iter().chain(&self.inputs) {
            params.remove(name);
        }

        Self {
            f: self.f.iter().map(|e| e.substitute(&params)).collect(),
            h: self.h.iter().map(|e| e.substitute(&params)).collect(),
            ..self.clone()
        }
    }

    /// Linearizes the dynamics about an operating point.
    ///
    /// Returns `A = ∂f/∂x`, `B = ∂f/∂u`, `C = ∂h/∂x` and `D = ∂h/∂u` with the
    /// states and inputs replaced by the point's values. Parameters stay
    /// symbolic.
    ///
    /// # Errors
    ///
    /// Returns [`SymbolicError::PointLength`] if the point does not match the
    /// number of states or inputs.
    pub fn linearize(&self, point: &OperatingPoint) -> Result<SymbolicStateSpace, SymbolicError> {
        check_length("state", self.n_states(), point.states.len())?;
        check_length("input", self.n_inputs(), point.inputs.len())?;

        let at_point: Substitution = self
            .states
            .iter()
            .zip(&point.states)
            .chain(self.inputs.iter().zip(&point.inputs))
            .map(|(name, value)| (name.as_str(), *value))
            .collect();

        let jacobian = |exprs: &[Expr], vars: &[String]| {
            SymbolicMatrix::jacobian(exprs, vars).substitute(&at_point)
        };

        debug!(
            n_states = self.n_states(),
            n_inputs = self.n_inputs(),
            "linearizing symbolic dynamics"
        );

        SymbolicStateSpace::new(
            jacobian(&self.f, &self.states),
            jacobian(&self.f, &self.inputs),
            jacobian(&self.h, &self.states),
            jacobian(&self.h, &self.inputs),
            &self.states,
            &self.inputs,
            &self.outputs,
        )
    }

    /// Evaluates `f(x, u)`.
    ///
    /// # Errors
    ///
    /// Returns an error if a vector has the wrong length or an equation
    /// cannot be evaluated.
    pub fn derivative(
        &self,
        x: &DVector<f64>,
        u: &DVector<f64>,
        params: &Substitution,
    ) -> Result<DVector<f64>, SymbolicError> {
        let values = self.point_values(x, u, params)?;
        evaluate_all("f", &self.f, &values)
    }

    /// Evaluates `h(x, u)`.
    ///
    /// # Errors
    ///
    /// Returns an error if a vector has the wrong length or an equation
    /// cannot be evaluated.
    pub fn output(
        &self,
        x: &DVector<f64>,
        u: &DVector<f64>,
        params: &Substitution,
    ) -> Result<DVector<f64>, SymbolicError> {
        let values = self.point_values(x, u, params)?;
        evaluate_all("h", &self.h, &values)
    }

    /// Evaluates `f(x, u)` and `h(x, u)` together.
    ///
    /// # Errors
    ///
    /// Returns an error if a vector has the wrong length or an equation
    /// cannot be evaluated.
    pub fn evaluate_rhs(
        &self,
        x: &DVector<f64>,
        u: &DVector<f64>,
        params: &Substitution,
    ) -> Result<(DVector<f64>, DVector<f64>), SymbolicError> {
        let values = self.point_values(x, u, params)?;
        Ok((
            evaluate_all("f", &self.f, &values)?,
            evaluate_all("h", &self.h, &values)?,
        ))
    }

    fn point_values(
        &self,
        x: &DVector<f64>,
        u: &DVector<f64>,
        params: &Substitution,
    ) -> Result<Substitution, SymbolicError> {
        check_length("state", self.n_states(), x.len())?;
        check_length("input", self.n_inputs(), u.len())?;

        let mut values = params.clone();
        values.extend(self.states.iter().map(String::as_str).zip(x.iter().copied()));
        values.extend(self.inputs.iter().map(String::as_str).zip(u.iter().copied()));
        Ok(values)
    }
}

fn evaluate_all(
    name: &'static str,
    exprs: &[Expr],
    values: &Substitution,
) -> Result<DVector<f64>, SymbolicError> {
    let entries = exprs
        .iter()
        .enumerate()
        .map(|(row, expr)| {
            expr.evaluate(values).map_err(|source| SymbolicError::Entry {
                matrix: name,
                row,
                col: 0,
                source: Box::new(source),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DVector::from_vec(entries))
}

fn check_count(kind: &'static str, names: usize, equations: usize) -> Result<(), SymbolicError> {
    if names == equations {
        Ok(())
    } else {
        Err(SymbolicError::NameCount {
            kind,
            expected: equations,
            actual: names,
        })
    }
}

fn check_length(kind: &'static str, expected: usize, actual: usize) -> Result<(), SymbolicError> {
    if expected == actual {
        Ok(())
    } else {
        Err(SymbolicError::PointLength {
            kind,
            expected,
            actual,
        })
    }
}
