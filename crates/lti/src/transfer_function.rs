use std::fmt;

use nalgebra::{Complex, DMatrix};
use tracing::debug;

use crate::{LtiError, Polynomial, state_space::check_index};

/// Relative tolerance used to drop round-off from assembled numerators.
const NUMERATOR_REL_TOL: f64 = 1e-12;

/// The time domain a transfer function lives in.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub enum Domain {
    /// Laplace variable `s`.
    Continuous,
    /// Shift variable `z` with sample time `dt` in seconds.
    Discrete { dt: f64 },
}

impl Domain {
    fn variable(self) -> &'static str {
        match self {
            Self::Continuous => "s",
            Self::Discrete { .. } => "z",
        }
    }
}

/// A single-input single-output rational transfer function `num / den`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawTransferFunction", into = "RawTransferFunction")
)]
pub struct TransferFunction {
    num: Polynomial,
    den: Polynomial,
    domain: Domain,
}

impl TransferFunction {
    /// Creates a transfer function.
    ///
    /// # Errors
    ///
    /// Returns [`LtiError::ZeroDenominator`] if `den` is the zero polynomial,
    /// or [`LtiError::InvalidSampleTime`] for a discrete domain whose sample
    /// time is not finite and positive.
    pub fn new(num: Polynomial, den: Polynomial, domain: Domain) -> Result<Self, LtiError> {
        if den.is_zero() {
            return Err(LtiError::ZeroDenominator);
        }
        if let Domain::Discrete { dt } = domain {
            if !(dt.is_finite() && dt > 0.0) {
                return Err(LtiError::InvalidSampleTime(dt));
            }
        }
        Ok(Self { num, den, domain })
    }

    #[must_use]
    pub fn numerator(&self) -> &Polynomial {
        &self.num
    }

    #[must_use]
    pub fn denominator(&self) -> &Polynomial {
        &self.den
    }

    #[must_use]
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Evaluates the transfer function at a point of the complex plane.
    #[must_use]
    pub fn evaluate(&self, point: Complex<f64>) -> Complex<f64> {
        self.num.evaluate_complex(point) / self.den.evaluate_complex(point)
    }

    /// Evaluates the transfer function on the frequency axis.
    ///
    /// Continuous systems are evaluated at `s = jω`, discrete systems at
    /// `z = e^{jω·dt}`.
    #[must_use]
    pub fn frequency_response(&self, omega: f64) -> Complex<f64> {
        let point = match self.domain {
            Domain::Continuous => Complex::new(0.0, omega),
            Domain::Discrete { dt } => Complex::from_polar(1.0, omega * dt),
        };
        self.evaluate(point)
    }

    /// Returns the steady-state gain.
    ///
    /// The result is infinite (or NaN) when the system has a pole at `s = 0`
    /// or `z = 1`.
    #[must_use]
    pub fn dc_gain(&self) -> f64 {
        let point = match self.domain {
            Domain::Continuous => 0.0,
            Domain::Discrete { .. } => 1.0,
        };
        self.num.evaluate(point) / self.den.evaluate(point)
    }

    /// Returns the roots of the denominator.
    #[must_use]
    pub fn poles(&self) -> Vec<Complex<f64>> {
        self.den.roots()
    }

    /// Returns the roots of the numerator.
    #[must_use]
    pub fn zeros(&self) -> Vec<Complex<f64>> {
        self.num.roots()
    }

    /// Returns the relative degree, `deg(den) − deg(num)`.
    #[must_use]
    pub fn relative_degree(&self) -> Option<isize> {
        let den = self.den.degree()?;
        let num = self.num.degree()?;
        Some(den as isize - num as isize)
    }

    /// Returns an equivalent transfer function with a monic denominator and
    /// negligible leading numerator terms removed.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let lead = self.den.leading();
        Self {
            num: self.num.trimmed(NUMERATOR_REL_TOL).scale(1.0 / lead),
            den: self.den.scale(1.0 / lead),
            domain: self.domain,
        }
    }
}

impl fmt::Display for TransferFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let var = self.domain.variable();
        write!(
            f,
            "({}) / ({})",
            self.num.display_in(var),
            self.den.display_in(var)
        )?;
        if let Domain::Discrete { dt } = self.domain {
            write!(f, ", dt = {dt}")?;
        }
        Ok(())
    }
}

/// Serialized form of [`TransferFunction`], validated on conversion.
#[cfg(feature = "serde-derive")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawTransferFunction {
    num: Polynomial,
    den: Polynomial,
    domain: Domain,
}

#[cfg(feature = "serde-derive")]
impl TryFrom<RawTransferFunction> for TransferFunction {
    type Error = LtiError;

    fn try_from(raw: RawTransferFunction) -> Result<Self, Self::Error> {
        Self::new(raw.num, raw.den, raw.domain)
    }
}

#[cfg(feature = "serde-derive")]
impl From<TransferFunction> for RawTransferFunction {
    fn from(tf: TransferFunction) -> Self {
        Self {
            num: tf.num,
            den: tf.den,
            domain: tf.domain,
        }
    }
}

/// Builds the transfer function of one input/output pair with the
/// Faddeev–LeVerrier algorithm.
///
/// With `adj(sI − A) = Σₖ Mₖ s^{n−k}` and characteristic polynomial `p(s)`:
///
/// ```text
/// G(s) = (Σₖ C Mₖ B s^{n−k} + D p(s)) / p(s)
/// ```
pub(crate) fn from_state_space(
    (a, b, c, d): (&DMatrix<f64>, &DMatrix<f64>, &DMatrix<f64>, &DMatrix<f64>),
    input: usize,
    output: usize,
    domain: Domain,
) -> Result<TransferFunction, LtiError> {
    check_index("input", input, b.ncols())?;
    check_index("output", output, c.nrows())?;

    let n = a.nrows();
    let (char_poly, adjugate_terms) = leverrier(a);

    let b_col = b.column(input);
    let c_row = c.row(output);

    // Numerator of C adj(sI − A) B, degree n − 1, padded to degree n.
    let mut num = Vec::with_capacity(n + 1);
    num.push(0.0);
    num.extend(adjugate_terms.iter().map(|m| (&c_row * m * &b_col)[(0, 0)]));

    let den = Polynomial::new(char_poly);
    let feedthrough = den.scale(d[(output, input)]);
    let num = &Polynomial::new(num) + &feedthrough;

    debug!(input, output, n_states = n, ?domain, "converted state-space to transfer function");

    TransferFunction::new(num.trimmed(NUMERATOR_REL_TOL), den, domain)
}

/// Returns the characteristic polynomial of `a` (descending, monic) and the
/// matrices `M₁…Mₙ` of the adjugate expansion.
fn leverrier(a: &DMatrix<f64>) -> (Vec<f64>, Vec<DMatrix<f64>>) {
    let n = a.nrows();
    let identity = DMatrix::<f64>::identity(n, n);

    let mut coeffs = Vec::with_capacity(n + 1);
    coeffs.push(1.0);
    let mut terms = Vec::with_capacity(n);

    let mut m = DMatrix::<f64>::zeros(n, n);
    let mut prev = 1.0;
    for k in 1..=n {
        m = a * &m + &identity * prev;
        let coeff = -(a * &m).trace() / k as f64;
        terms.push(m.clone());
        coeffs.push(coeff);
        prev = coeff;
    }

    (coeffs, terms)
}
