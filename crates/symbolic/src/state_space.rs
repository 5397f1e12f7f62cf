use std::collections::{BTreeSet, HashSet};

use actuate_lti::StateSpace;
use tracing::debug;

use crate::{Substitution, SymbolicError, SymbolicMatrix};

/// A linear system whose matrices are expressions in parameter symbols.
///
/// Names label the states, inputs and outputs in order, so the system can be
/// queried by name as well as by index.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolicStateSpace {
    a: SymbolicMatrix,
    b: SymbolicMatrix,
    c: SymbolicMatrix,
    d: SymbolicMatrix,
    states: Vec<String>,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl SymbolicStateSpace {
    /// Creates a symbolic system.
    ///
    /// The number of states, inputs and outputs comes from the name lists.
    ///
    /// # Errors
    ///
    /// Returns [`SymbolicError::DimensionMismatch`] naming the first matrix
    /// whose shape does not match, or [`SymbolicError::DuplicateName`] if a
    /// name is repeated within a list.
    pub fn new<S: AsRef<str>>(
        a: SymbolicMatrix,
        b: SymbolicMatrix,
        c: SymbolicMatrix,
        d: SymbolicMatrix,
        states: &[S],
        inputs: &[S],
        outputs: &[S],
    ) -> Result<Self, SymbolicError> {
        let states = owned_names(states)?;
        let inputs = owned_names(inputs)?;
        let outputs = owned_names(outputs)?;

        let (n, m, p) = (states.len(), inputs.len(), outputs.len());
        for (matrix, expected, actual) in [
            ("A", (n, n), a.shape()),
            ("B", (n, m), b.shape()),
            ("C", (p, n), c.shape()),
            ("D", (p, m), d.shape()),
        ] {
            if expected != actual {
                return Err(SymbolicError::DimensionMismatch {
                    matrix,
                    expected,
                    actual,
                });
            }
        }

        Ok(Self {
            a,
            b,
            c,
            d,
            states,
            inputs,
            outputs,
        })
    }

    #[must_use]
    pub fn a(&self) -> &SymbolicMatrix {
        &self.a
    }

    #[must_use]
    pub fn b(&self) -> &SymbolicMatrix {
        &self.b
    }

    #[must_use]
    pub fn c(&self) -> &SymbolicMatrix {
        &self.c
    }

    #[must_use]
    pub fn d(&self) -> &SymbolicMatrix {
        &self.d
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

    #[must_use]
    pub fn state_index(&self, name: &str) -> Option<usize> {
        self.states.iter().position(|s| s == name)
    }

    #[must_use]
    pub fn input_index(&self, name: &str) -> Option<usize> {
        self.inputs.iter().position(|s| s == name)
    }

    #[must_use]
    pub fn output_index(&self, name: &str) -> Option<usize> {
        self.outputs.iter().position(|s| s == name)
    }

    /// Returns the free symbols of all four matrices.
    #[must_use]
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        for matrix in [&self.a, &self.b, &self.c, &self.d] {
            out.extend(matrix.symbols());
        }
        out
    }

    /// Substitutes bound symbols, keeping the system symbolic.
    #[must_use]
    pub fn bind(&self, values: &Substitution) -> Self {
        Self {
            a: self.a.substitute(values),
            b: self.b.substitute(values),
            c: self.c.substitute(values),
            d: self.d.substitute(values),
            ..self.clone()
        }
    }

    /// Evaluates the matrices into a numeric system.
    ///
    /// # Errors
    ///
    /// Returns [`SymbolicError::Entry`] naming the matrix and entry that
    /// could not be evaluated, or [`SymbolicError::Lti`] if the numeric
    /// system is rejected.
    pub fn substitute(&self, values: &Substitution) -> Result<StateSpace, SymbolicError> {
        let a = self.a.evaluate_named("A", values)?;
        let b = self.b.evaluate_named("B", values)?;
        let c = self.c.evaluate_named("C", values)?;
        let d = self.d.evaluate_named("D", values)?;

        debug!(
            n_states = self.n_states(),
            n_inputs = self.n_inputs(),
            n_outputs = self.n_outputs(),
            bindings = values.len(),
            "substituted symbolic state-space"
        );

        Ok(StateSpace::new(a, b, c, d)?)
    }
}

fn owned_names<S: AsRef<str>>(names: &[S]) -> Result<Vec<String>, SymbolicError> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            if seen.insert(name) {
                Ok(name.to_owned())
            } else {
                Err(SymbolicError::DuplicateName(name.to_owned()))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::Expr;

    fn sym(name: &str) -> Expr {
        Expr::symbol(name)
    }

    /// Inertia on a spring with damping, driven by a torque.
    fn oscillator() -> SymbolicStateSpace {
        let (j, k, d) = (sym("J"), sym("k"), sym("d"));
        SymbolicStateSpace::new(
            SymbolicMatrix::from_rows(vec![
                vec![Expr::zero(), Expr::one()],
                vec![-(&k / &j), -(&d / &j)],
            ])
            .unwrap(),
            SymbolicMatrix::column(vec![Expr::zero(), 1.0 / &j]),
            SymbolicMatrix::from_rows(vec![vec![Expr::one(), Expr::zero()]]).unwrap(),
            SymbolicMatrix::zeros(1, 1),
            &["q", "dq"],
            &["tau"],
            &["q"],
        )
        .unwrap()
    }

    #[test]
    fn shape_errors_name_the_matrix() {
        let err = SymbolicStateSpace::new(
            SymbolicMatrix::zeros(2, 2),
            SymbolicMatrix::zeros(2, 1),
            SymbolicMatrix::zeros(1, 3),
            SymbolicMatrix::zeros(1, 1),
            &["x1", "x2"],
            &["u"],
            &["y"],
        )
        .unwrap_err();

        assert_eq!(
            err,
            SymbolicError::DimensionMismatch {
                matrix: "C",
                expected: (1, 2),
                actual: (1, 3),
            }
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = SymbolicStateSpace::new(
            SymbolicMatrix::zeros(2, 2),
            SymbolicMatrix::zeros(2, 0),
            SymbolicMatrix::zeros(0, 2),
            SymbolicMatrix::zeros(0, 0),
            &["x", "x"],
            &[],
            &[],
        )
        .unwrap_err();

        assert_eq!(err, SymbolicError::DuplicateName("x".into()));
    }

    #[test]
    fn names_and_symbols() {
        let sys = oscillator();

        assert_eq!(sys.state_index("dq"), Some(1));
        assert_eq!(sys.input_index("tau"), Some(0));
        assert_eq!(sys.output_index("dq"), None);

        let names: Vec<_> = sys.symbols().into_iter().collect();
        assert_eq!(names, ["J", "d", "k"]);
    }

    #[test]
    fn substitute_gives_numeric_system() {
        let values: Substitution = [("J", 2.0), ("k", 8.0), ("d", 1.0)].into_iter().collect();
        let numeric = oscillator().substitute(&values).unwrap();

        assert_eq!(numeric.n_states(), 2);
        assert_relative_eq!(numeric.a()[(1, 0)], -4.0);
        assert_relative_eq!(numeric.b()[(1, 0)], 0.5);
        assert_relative_eq!(numeric.dc_gain().unwrap()[(0, 0)], 1.0 / 8.0, epsilon = 1e-12);
    }

    #[test]
    fn missing_parameter_is_reported_with_matrix() {
        let values: Substitution = [("J", 2.0), ("k", 8.0)].into_iter().collect();
        let err = oscillator().substitute(&values).unwrap_err();

        assert!(matches!(
            err,
            SymbolicError::Entry {
                matrix: "A",
                row: 1,
                col: 1,
                ..
            }
        ));
        assert_eq!(err.root_cause(), &SymbolicError::UnboundSymbol("d".into()));
    }

    #[test]
    fn bind_is_partial() {
        let bound = oscillator().bind(&Substitution::new().with_value("J", 2.0));
        let names: Vec<_> = bound.symbols().into_iter().collect();

        assert_eq!(names, ["d", "k"]);
        assert_eq!(bound.states(), ["q", "dq"]);
    }
}
