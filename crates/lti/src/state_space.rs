use nalgebra::{Complex, DMatrix, DVector};

use crate::{
    Discretization, DiscreteStateSpace, LtiError, TransferFunction, discretize,
    transfer_function::{self, Domain},
};

/// A continuous-time linear system `ẋ = A x + B u`, `y = C x + D u`.
///
/// With `n` states, `m` inputs and `p` outputs, `A` is `n×n`, `B` is `n×m`,
/// `C` is `p×n` and `D` is `p×m`. A system with no states is a static gain `D`.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpace {
    a: DMatrix<f64>,
    b: DMatrix<f64>,
    c: DMatrix<f64>,
    d: DMatrix<f64>,
}

impl StateSpace {
    /// Creates a system from its four matrices.
    ///
    /// # Errors
    ///
    /// Returns [`LtiError::DimensionMismatch`] if the shapes are inconsistent,
    /// or [`LtiError::NonFinite`] if any entry is NaN or infinite.
    pub fn new(
        a: DMatrix<f64>,
        b: DMatrix<f64>,
        c: DMatrix<f64>,
        d: DMatrix<f64>,
    ) -> Result<Self, LtiError> {
        validate(&a, &b, &c, &d)?;
        Ok(Self { a, b, c, d })
    }

    /// Returns the state matrix `A`.
    #[must_use]
    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    /// Returns the input matrix `B`.
    #[must_use]
    pub fn b(&self) -> &DMatrix<f64> {
        &self.b
    }

    /// Returns the output matrix `C`.
    #[must_use]
    pub fn c(&self) -> &DMatrix<f64> {
        &self.c
    }

    /// Returns the feedthrough matrix `D`.
    #[must_use]
    pub fn d(&self) -> &DMatrix<f64> {
        &self.d
    }

    /// Returns the number of states.
    #[must_use]
    pub fn n_states(&self) -> usize {
        self.a.nrows()
    }

    /// Returns the number of inputs.
    #[must_use]
    pub fn n_inputs(&self) -> usize {
        self.b.ncols()
    }

    /// Returns the number of outputs.
    #[must_use]
    pub fn n_outputs(&self) -> usize {
        self.c.nrows()
    }

    /// Returns the eigenvalues of `A`.
    #[must_use]
    pub fn poles(&self) -> Vec<Complex<f64>> {
        eigenvalues(&self.a)
    }

    /// Returns `true` if every pole lies strictly in the left half-plane.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.poles().iter().all(|p| p.re < 0.0)
    }

    /// Returns the steady-state gain `D − C A⁻¹ B`.
    ///
    /// # Errors
    ///
    /// Returns [`LtiError::Singular`] if `A` has a pole at the origin.
    pub fn dc_gain(&self) -> Result<DMatrix<f64>, LtiError> {
        if self.n_states() == 0 {
            return Ok(self.d.clone());
        }

        let a_inv_b = self
            .a
            .clone()
            .lu()
            .solve(&self.b)
            .ok_or(LtiError::Singular("A"))?;

        Ok(&self.d - &self.c * a_inv_b)
    }

    /// Evaluates `C (jωI − A)⁻¹ B + D` for one input/output pair.
    ///
    /// # Errors
    ///
    /// Returns an error if an index is out of range or `jω` is a pole.
    pub fn frequency_response(
        &self,
        input: usize,
        output: usize,
        omega: f64,
    ) -> Result<Complex<f64>, LtiError> {
        check_index("input", input, self.n_inputs())?;
        check_index("output", output, self.n_outputs())?;

        let feedthrough = Complex::new(self.d[(output, input)], 0.0);
        let n = self.n_states();
        if n == 0 {
            return Ok(feedthrough);
        }

        let s = Complex::new(0.0, omega);
        let resolvent = DMatrix::<Complex<f64>>::from_fn(n, n, |i, j| {
            let diagonal = if i == j { s } else { Complex::new(0.0, 0.0) };
            diagonal - self.a[(i, j)]
        });
        let b_col = DVector::<Complex<f64>>::from_fn(n, |i, _| Complex::new(self.b[(i, input)], 0.0));

        let x = resolvent
            .lu()
            .solve(&b_col)
            .ok_or(LtiError::Singular("jωI − A"))?;

        let response = (0..n).fold(feedthrough, |acc, k| acc + x[k] * self.c[(output, k)]);
        Ok(response)
    }

    /// Converts the system to discrete time with sample time `dt`.
    ///
    /// # Errors
    ///
    /// Returns an error if `dt` is not finite and positive, or the method
    /// needs to invert a singular matrix.
    pub fn discretize(
        &self,
        dt: f64,
        method: Discretization,
    ) -> Result<DiscreteStateSpace, LtiError> {
        discretize::discretize(self, dt, method)
    }

    /// Returns the transfer function from one input to one output.
    ///
    /// # Errors
    ///
    /// Returns [`LtiError::IndexOutOfRange`] for an invalid index.
    pub fn transfer_function(
        &self,
        input: usize,
        output: usize,
    ) -> Result<TransferFunction, LtiError> {
        transfer_function::from_state_space(
            (&self.a, &self.b, &self.c, &self.d),
            input,
            output,
            Domain::Continuous,
        )
    }

    /// Returns every transfer function, indexed `[output][input]`.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`transfer_function`](Self::transfer_function).
    pub fn transfer_matrix(&self) -> Result<Vec<Vec<TransferFunction>>, LtiError> {
        (0..self.n_outputs())
            .map(|output| {
                (0..self.n_inputs())
                    .map(|input| self.transfer_function(input, output))
                    .collect()
            })
            .collect()
    }
}

/// Checks the shapes and entries of a state-space quadruple.
pub(crate) fn validate(
    a: &DMatrix<f64>,
    b: &DMatrix<f64>,
    c: &DMatrix<f64>,
    d: &DMatrix<f64>,
) -> Result<(), LtiError> {
    let n = a.nrows();
    let m = b.ncols();
    let p = c.nrows();

    let expect = |matrix, expected: (usize, usize), actual: &DMatrix<f64>| {
        if actual.shape() == expected {
            Ok(())
        } else {
            Err(LtiError::DimensionMismatch {
                matrix,
                expected,
                actual: actual.shape(),
            })
        }
    };

    expect("A", (n, n), a)?;
    expect("B", (n, m), b)?;
    expect("C", (p, n), c)?;
    expect("D", (p, m), d)?;

    for (name, matrix) in [("A", a), ("B", b), ("C", c), ("D", d)] {
        if matrix.iter().any(|x| !x.is_finite()) {
            return Err(LtiError::NonFinite { matrix: name });
        }
    }

    Ok(())
}

pub(crate) fn check_index(kind: &'static str, index: usize, len: usize) -> Result<(), LtiError> {
    if index < len {
        Ok(())
    } else {
        Err(LtiError::IndexOutOfRange { kind, index, len })
    }
}

pub(crate) fn eigenvalues(a: &DMatrix<f64>) -> Vec<Complex<f64>> {
    if a.nrows() == 0 {
        return Vec::new();
    }
    a.complex_eigenvalues().iter().copied().collect()
}
