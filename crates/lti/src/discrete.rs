use nalgebra::{Complex, DMatrix, DVector};

use crate::{
    LtiError, TransferFunction,
    state_space::{check_index, eigenvalues, validate},
    transfer_function::{self, Domain},
};

/// A discrete-time linear system `x[k+1] = A x[k] + B u[k]`, `y[k] = C x[k] + D u[k]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteStateSpace {
    a: DMatrix<f64>,
    b: DMatrix<f64>,
    c: DMatrix<f64>,
    d: DMatrix<f64>,
    dt: f64,
}

/// State and output trajectories of a discrete simulation.
///
/// `states` has one more entry than `outputs`: it includes the state after
/// the last input was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub dt: f64,
    pub states: Vec<DVector<f64>>,
    pub outputs: Vec<DVector<f64>>,
}

impl Response {
    /// Returns the sample times of the outputs.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.outputs.len()).map(|k| k as f64 * self.dt)
    }

    /// Returns one output channel as a series.
    #[must_use]
    pub fn output_series(&self, output: usize) -> Vec<f64> {
        self.outputs.iter().map(|y| y[output]).collect()
    }
}

impl DiscreteStateSpace {
    /// Creates a discrete system from its four matrices and sample time.
    ///
    /// # Errors
    ///
    /// Returns an error if the shapes are inconsistent, an entry is not
    /// finite, or `dt` is not finite and positive.
    pub fn new(
        a: DMatrix<f64>,
        b: DMatrix<f64>,
        c: DMatrix<f64>,
        d: DMatrix<f64>,
        dt: f64,
    ) -> Result<Self, LtiError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(LtiError::InvalidSampleTime(dt));
        }
        validate(&a, &b, &c, &d)?;
        Ok(Self { a, b, c, d, dt })
    }

    #[must_use]
    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    #[must_use]
    pub fn b(&self) -> &DMatrix<f64> {
        &self.b
    }

    #[must_use]
    pub fn c(&self) -> &DMatrix<f64> {
        &self.c
    }

    #[must_use]
    pub fn d(&self) -> &DMatrix<f64> {
        &self.d
    }

    /// Returns the sample time in seconds.
    #[must_use]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    #[must_use]
    pub fn n_states(&self) -> usize {
        self.a.nrows()
    }

    #[must_use]
    pub fn n_inputs(&self) -> usize {
        self.b.ncols()
    }

    #[must_use]
    pub fn n_outputs(&self) -> usize {
        self.c.nrows()
    }

    /// Returns the eigenvalues of `A`.
    #[must_use]
    pub fn poles(&self) -> Vec<Complex<f64>> {
        eigenvalues(&self.a)
    }

    /// Returns `true` if every pole lies strictly inside the unit circle.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.poles().iter().all(|p| p.norm() < 1.0)
    }

    /// Returns the steady-state gain `D + C (I − A)⁻¹ B`.
    ///
    /// # Errors
    ///
    /// Returns [`LtiError::Singular`] if `A` has a pole at `z = 1`.
    pub fn dc_gain(&self) -> Result<DMatrix<f64>, LtiError> {
        if self.n_states() == 0 {
            return Ok(self.d.clone());
        }

        let n = self.n_states();
        let x = (DMatrix::<f64>::identity(n, n) - &self.a)
            .lu()
            .solve(&self.b)
            .ok_or(LtiError::Singular("I − A"))?;

        Ok(&self.d + &self.c * x)
    }

    /// Advances the system by one sample, returning the next state and the
    /// output at the current sample.
    ///
    /// # Errors
    ///
    /// Returns [`LtiError::SignalLength`] if `x` or `u` has the wrong length.
    pub fn step(
        &self,
        x: &DVector<f64>,
        u: &DVector<f64>,
    ) -> Result<(DVector<f64>, DVector<f64>), LtiError> {
        check_length("state", self.n_states(), x.len())?;
        check_length("input", self.n_inputs(), u.len())?;

        let y = &self.c * x + &self.d * u;
        let next = &self.a * x + &self.b * u;
        Ok((next, y))
    }

    /// Simulates the system from `x0` over a sequence of inputs.
    ///
    /// # Errors
    ///
    /// Returns an error if `x0` or any input has the wrong length.
    pub fn simulate(
        &self,
        x0: DVector<f64>,
        inputs: &[DVector<f64>],
    ) -> Result<Response, LtiError> {
        let mut states = Vec::with_capacity(inputs.len() + 1);
        let mut outputs = Vec::with_capacity(inputs.len());

        let mut x = x0;
        for u in inputs {
            let (next, y) = self.step(&x, u)?;
            states.push(x);
            outputs.push(y);
            x = next;
        }
        states.push(x);

        Ok(Response {
            dt: self.dt,
            states,
            outputs,
        })
    }

    /// Simulates a unit step on one input from rest.
    ///
    /// # Errors
    ///
    /// Returns [`LtiError::IndexOutOfRange`] for an invalid input index.
    pub fn step_response(&self, input: usize, steps: usize) -> Result<Response, LtiError> {
        check_index("input", input, self.n_inputs())?;

        let mut u = DVector::zeros(self.n_inputs());
        u[input] = 1.0;
        let inputs = vec![u; steps];

        self.simulate(DVector::zeros(self.n_states()), &inputs)
    }

    /// Returns the pulse transfer function from one input to one output.
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
            Domain::Discrete { dt: self.dt },
        )
    }
}

fn check_length(signal: &'static str, expected: usize, actual: usize) -> Result<(), LtiError> {
    if expected == actual {
        Ok(())
    } else {
        Err(LtiError::SignalLength {
            signal,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{Discretization, StateSpace};

    fn discrete_lag(tau: f64, dt: f64) -> DiscreteStateSpace {
        StateSpace::new(
            DMatrix::from_element(1, 1, -1.0 / tau),
            DMatrix::from_element(1, 1, 1.0 / tau),
            DMatrix::from_element(1, 1, 1.0),
            DMatrix::zeros(1, 1),
        )
        .unwrap()
        .discretize(dt, Discretization::ZeroOrderHold)
        .unwrap()
    }

    #[test]
    fn rejects_bad_sample_time() {
        let err = DiscreteStateSpace::new(
            DMatrix::zeros(1, 1),
            DMatrix::zeros(1, 1),
            DMatrix::zeros(1, 1),
            DMatrix::zeros(1, 1),
            0.0,
        )
        .unwrap_err();
        assert_eq!(err, LtiError::InvalidSampleTime(0.0));
    }

    #[test]
    fn step_response_samples_the_exponential() {
        let (tau, dt) = (0.1, 0.01);
        let sys = discrete_lag(tau, dt);
        let response = sys.step_response(0, 50).unwrap();

        assert_eq!(response.outputs.len(), 50);
        assert_eq!(response.states.len(), 51);

        for (t, y) in response.times().zip(response.output_series(0)) {
            assert_relative_eq!(y, 1.0 - (-t / tau).exp(), epsilon = 1e-10);
        }
    }

    #[test]
    fn stability_inside_unit_circle() {
        assert!(discrete_lag(0.1, 0.01).is_stable());

        let unstable = DiscreteStateSpace::new(
            DMatrix::from_element(1, 1, 1.01),
            DMatrix::zeros(1, 1),
            DMatrix::zeros(1, 1),
            DMatrix::zeros(1, 1),
            0.01,
        )
        .unwrap();
        assert!(!unstable.is_stable());
    }

    #[test]
    fn step_checks_signal_lengths() {
        let sys = discrete_lag(0.1, 0.01);
        let err = sys
            .step(&DVector::zeros(2), &DVector::zeros(1))
            .unwrap_err();

        assert_eq!(
            err,
            LtiError::SignalLength {
                signal: "state",
                expected: 1,
                actual: 2,
            }
        );
    }

    #[test]
    fn step_response_rejects_bad_input() {
        let sys = discrete_lag(0.1, 0.01);
        assert!(matches!(
            sys.step_response(3, 10),
            Err(LtiError::IndexOutOfRange { kind: "input", .. })
        ));
    }

    #[test]
    fn dc_gain_of_discrete_lag() {
        let gain = discrete_lag(0.2, 0.05).dc_gain().unwrap();
        assert_relative_eq!(gain[(0, 0)], 1.0, epsilon = 1e-12);
    }
}
