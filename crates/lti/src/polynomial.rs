use std::{
    fmt,
    ops::{Add, Mul},
};

use nalgebra::{Complex, DMatrix};

/// A real polynomial with coefficients in descending powers.
///
/// `[1.0, 3.0, 2.0]` is `x² + 3x + 2`. An empty coefficient list is the zero
/// polynomial.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "RawPolynomial", into = "RawPolynomial")
)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    /// Creates a polynomial from coefficients in descending powers.
    ///
    /// Leading exact zeros are dropped.
    #[must_use]
    pub fn new(coeffs: impl Into<Vec<f64>>) -> Self {
        let mut coeffs = coeffs.into();
        let first = coeffs.iter().position(|&c| c != 0.0).unwrap_or(coeffs.len());
        coeffs.drain(..first);
        Self { coeffs }
    }

    /// Creates the constant polynomial `value`.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Returns the coefficients in descending powers.
    #[must_use]
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    /// Returns `true` for the zero polynomial.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Returns the degree, or `None` for the zero polynomial.
    #[must_use]
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// Returns the coefficient of the highest power, zero for the zero polynomial.
    #[must_use]
    pub fn leading(&self) -> f64 {
        self.coeffs.first().copied().unwrap_or(0.0)
    }

    /// Evaluates the polynomial at a real point.
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coeffs.iter().fold(0.0, |acc, &c| acc * x + c)
    }

    /// Evaluates the polynomial at a complex point.
    #[must_use]
    pub fn evaluate_complex(&self, z: Complex<f64>) -> Complex<f64> {
        self.coeffs
            .iter()
            .fold(Complex::new(0.0, 0.0), |acc, &c| acc * z + c)
    }

    /// Returns the polynomial multiplied by a scalar.
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.coeffs.iter().map(|c| c * factor).collect::<Vec<_>>())
    }

    /// Returns a copy with leading coefficients that are negligible relative
    /// to the largest coefficient removed.
    ///
    /// Numerators assembled from state-space data often carry round-off in
    /// their leading terms; trimming restores the true relative degree.
    #[must_use]
    pub fn trimmed(&self, rel_tol: f64) -> Self {
        let scale = self.coeffs.iter().fold(0.0_f64, |m, c| m.max(c.abs()));
        let threshold = scale * rel_tol;
        let first = self
            .coeffs
            .iter()
            .position(|c| c.abs() > threshold)
            .unwrap_or(self.coeffs.len());

        Self {
            coeffs: self.coeffs[first..].to_vec(),
        }
    }

    /// Returns the roots as eigenvalues of the companion matrix.
    ///
    /// Constant and zero polynomials have no roots.
    #[must_use]
    pub fn roots(&self) -> Vec<Complex<f64>> {
        let Some(degree) = self.degree() else {
            return Vec::new();
        };

        // Zero roots contributed by trailing zero coefficients.
        let trailing = self.coeffs.iter().rev().take_while(|&&c| c == 0.0).count();
        let reduced = &self.coeffs[..self.coeffs.len() - trailing];
        let n = degree - trailing;

        let mut roots = vec![Complex::new(0.0, 0.0); trailing];
        if n == 0 {
            return roots;
        }

        let lead = reduced[0];
        let mut companion = DMatrix::zeros(n, n);
        for (j, c) in reduced[1..].iter().enumerate() {
            companion[(0, j)] = -c / lead;
        }
        for i in 1..n {
            companion[(i, i - 1)] = 1.0;
        }

        roots.extend(companion.complex_eigenvalues().iter().copied());
        roots
    }

    /// Formats the polynomial in terms of the given variable name.
    #[must_use]
    pub fn display_in<'a>(&'a self, var: &'a str) -> impl fmt::Display + 'a {
        PolynomialDisplay { poly: self, var }
    }
}

impl<'a> Add<&'a Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn add(self, other: &'a Polynomial) -> Polynomial {
        let len = self.coeffs.len().max(other.coeffs.len());
        let pad = |p: &Polynomial, i: usize| {
            let offset = len - p.coeffs.len();
            if i < offset { 0.0 } else { p.coeffs[i - offset] }
        };

        Polynomial::new((0..len).map(|i| pad(self, i) + pad(other, i)).collect::<Vec<_>>())
    }
}

impl<'a> Mul<&'a Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn mul(self, other: &'a Polynomial) -> Polynomial {
        if self.is_zero() || other.is_zero() {
            return Polynomial::new(Vec::new());
        }

        let mut out = vec![0.0; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                out[i + j] += a * b;
            }
        }
        Polynomial::new(out)
    }
}

struct PolynomialDisplay<'a> {
    poly: &'a Polynomial,
    var: &'a str,
}

impl fmt::Display for PolynomialDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(degree) = self.poly.degree() else {
            return write!(f, "0");
        };

        let mut first = true;
        for (i, &c) in self.poly.coeffs.iter().enumerate() {
            if c == 0.0 {
                continue;
            }
            let power = degree - i;

            if first {
                if c < 0.0 {
                    write!(f, "-")?;
                }
            } else {
                write!(f, " {} ", if c < 0.0 { '-' } else { '+' })?;
            }
            first = false;

            let magnitude = c.abs();
            let show_coeff = power == 0 || magnitude != 1.0;
            if show_coeff {
                write!(f, "{magnitude}")?;
            }
            match power {
                0 => {}
                1 => write!(f, "{}{}", if show_coeff { " " } else { "" }, self.var)?,
                p => write!(f, "{}{}^{p}", if show_coeff { " " } else { "" }, self.var)?,
            }
        }

        Ok(())
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_in("x"))
    }
}

/// Serialized form of [`Polynomial`], normalized on conversion.
#[cfg(feature = "serde-derive")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawPolynomial {
    coeffs: Vec<f64>,
}

#[cfg(feature = "serde-derive")]
impl From<RawPolynomial> for Polynomial {
    fn from(raw: RawPolynomial) -> Self {
        Self::new(raw.coeffs)
    }
}

#[cfg(feature = "serde-derive")]
impl From<Polynomial> for RawPolynomial {
    fn from(poly: Polynomial) -> Self {
        Self { coeffs: poly.coeffs }
    }
}
