//! Continuous to discrete conversion of state-space systems.
//!
//! Exponential methods build an augmented matrix and take its matrix
//! exponential, for zero-order hold:
//!
//! ```text
//! exp(dt · [A  B]) = [Ad  Bd]
//!          [0  0]    [0   I ]
//! ```
//!
//! The generalized bilinear family (forward Euler, backward Euler, Tustin)
//! uses `(I − α·dt·A)⁻¹`:
//!
//! ```text
//! Ad = (I − α dt A)⁻¹ (I + (1 − α) dt A)
//! Bd = (I − α dt A)⁻¹ dt B
//! Cd = C (I − α dt A)⁻¹
//! Dd = D + α C Bd
//! ```

use nalgebra::DMatrix;
use tracing::debug;

use crate::{DiscreteStateSpace, LtiError, StateSpace};

/// A method for converting a continuous system to discrete time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub enum Discretization {
    /// Inputs held constant over each sample. Exact for piecewise-constant inputs.
    #[default]
    ZeroOrderHold,

    /// Inputs interpolated linearly between samples (triangle hold).
    FirstOrderHold,

    /// Inputs applied as impulses at the sample instants.
    Impulse,

    /// Explicit Euler, `α = 0`.
    ForwardEuler,

    /// Implicit Euler, `α = 1`.
    BackwardEuler,

    /// Bilinear transform, `α = ½`.
    Tustin,

    /// Generalized bilinear transform with weight `α ∈ [0, 1]`.
    Gbt { alpha: f64 },
}

impl Discretization {
    /// Returns the generalized bilinear weight for methods in that family.
    #[must_use]
    pub fn gbt_alpha(self) -> Option<f64> {
        match self {
            Self::ForwardEuler => Some(0.0),
            Self::BackwardEuler => Some(1.0),
            Self::Tustin => Some(0.5),
            Self::Gbt { alpha } => Some(alpha),
            Self::ZeroOrderHold | Self::FirstOrderHold | Self::Impulse => None,
        }
    }
}

pub(crate) fn discretize(
    sys: &StateSpace,
    dt: f64,
    method: Discretization,
) -> Result<DiscreteStateSpace, LtiError> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(LtiError::InvalidSampleTime(dt));
    }

    let (a, b, c, d) = (sys.a(), sys.b(), sys.c(), sys.d());
    let n = sys.n_states();

    let (ad, bd, cd, dd) = if n == 0 {
        if let Some(alpha) = method.gbt_alpha() {
            check_alpha(alpha)?;
        }
        (a.clone(), b.clone(), c.clone(), d.clone())
    } else {
        match method {
            Discretization::ZeroOrderHold => zero_order_hold(a, b, c, d, dt),
            Discretization::FirstOrderHold => first_order_hold(a, b, c, d, dt),
            Discretization::Impulse => impulse(a, b, c, d, dt),
            other => {
                let alpha = other.gbt_alpha().unwrap_or(0.5);
                generalized_bilinear(a, b, c, d, dt, alpha)?
            }
        }
    };

    debug!(?method, dt, n_states = n, "discretized state-space system");

    DiscreteStateSpace::new(ad, bd, cd, dd, dt)
}

type Quadruple = (DMatrix<f64>, DMatrix<f64>, DMatrix<f64>, DMatrix<f64>);

fn check_alpha(alpha: f64) -> Result<(), LtiError> {
    if (0.0..=1.0).contains(&alpha) {
        Ok(())
    } else {
        Err(LtiError::InvalidAlpha(alpha))
    }
}

fn zero_order_hold(
    a: &DMatrix<f64>,
    b: &DMatrix<f64>,
    c: &DMatrix<f64>,
    d: &DMatrix<f64>,
    dt: f64,
) -> Quadruple {
    let (n, m) = (a.nrows(), b.ncols());

    let mut aug = DMatrix::<f64>::zeros(n + m, n + m);
    aug.view_mut((0, 0), (n, n)).copy_from(a);
    aug.view_mut((0, n), (n, m)).copy_from(b);
    aug *= dt;

    let exp = aug.exp();
    let ad = exp.view((0, 0), (n, n)).clone_owned();
    let bd = exp.view((0, n), (n, m)).clone_owned();

    (ad, bd, c.clone(), d.clone())
}

fn first_order_hold(
    a: &DMatrix<f64>,
    b: &DMatrix<f64>,
    c: &DMatrix<f64>,
    d: &DMatrix<f64>,
    dt: f64,
) -> Quadruple {
    let (n, m) = (a.nrows(), b.ncols());
    let size = n + 2 * m;

    // [A·dt  B·dt  0]
    // [0     0     I]
    // [0     0     0]
    let mut aug = DMatrix::<f64>::zeros(size, size);
    aug.view_mut((0, 0), (n, n)).copy_from(&(a * dt));
    aug.view_mut((0, n), (n, m)).copy_from(&(b * dt));
    aug.view_mut((n, n + m), (m, m))
        .copy_from(&DMatrix::<f64>::identity(m, m));

    let exp = aug.exp();
    let phi = exp.view((0, 0), (n, n)).clone_owned();
    let gamma1 = exp.view((0, n), (n, m)).clone_owned();
    let gamma2 = exp.view((0, n + m), (n, m)).clone_owned();

    let bd = &gamma1 - &gamma2 + &phi * &gamma2;
    let dd = d + c * &gamma2;

    (phi, bd, c.clone(), dd)
}

fn impulse(
    a: &DMatrix<f64>,
    b: &DMatrix<f64>,
    c: &DMatrix<f64>,
    d: &DMatrix<f64>,
    dt: f64,
) -> Quadruple {
    let ad = (a * dt).exp();
    let bd = &ad * b * dt;
    let dd = d + c * b * dt;

    (ad, bd, c.clone(), dd)
}

fn generalized_bilinear(
    a: &DMatrix<f64>,
    b: &DMatrix<f64>,
    c: &DMatrix<f64>,
    d: &DMatrix<f64>,
    dt: f64,
    alpha: f64,
) -> Result<Quadruple, LtiError> {
    check_alpha(alpha)?;

    let n = a.nrows();
    let identity = DMatrix::<f64>::identity(n, n);
    let ima = &identity - a * (alpha * dt);
    let lu = ima.clone().lu();

    let ad = lu
        .solve(&(&identity + a * ((1.0 - alpha) * dt)))
        .ok_or(LtiError::Singular("I − α·dt·A"))?;
    let bd = lu
        .solve(&(b * dt))
        .ok_or(LtiError::Singular("I − α·dt·A"))?;
    let cd = ima
        .transpose()
        .lu()
        .solve(&c.transpose())
        .ok_or(LtiError::Singular("I − α·dt·A"))?
        .transpose();
    let dd = d + c * &bd * alpha;

    Ok((ad, bd, cd, dd))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    /// First-order lag: ẋ = -x/τ + u/τ, y = x.
    fn lag(tau: f64) -> StateSpace {
        StateSpace::new(
            DMatrix::from_element(1, 1, -1.0 / tau),
            DMatrix::from_element(1, 1, 1.0 / tau),
            DMatrix::from_element(1, 1, 1.0),
            DMatrix::zeros(1, 1),
        )
        .unwrap()
    }

    /// Double integrator: position and velocity driven by acceleration.
    fn double_integrator() -> StateSpace {
        StateSpace::new(
            DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 0.0, 0.0]),
            DMatrix::from_row_slice(2, 1, &[0.0, 1.0]),
            DMatrix::from_row_slice(1, 2, &[1.0, 0.0]),
            DMatrix::zeros(1, 1),
        )
        .unwrap()
    }

    #[test]
    fn invalid_sample_times() {
        let sys = lag(1.0);
        for dt in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let err = sys.discretize(dt, Discretization::ZeroOrderHold).unwrap_err();
            assert!(matches!(err, LtiError::InvalidSampleTime(_)));
        }
    }

    #[test]
    fn zero_order_hold_of_lag_is_exact() {
        let (tau, dt) = (0.2, 0.05);
        let d = lag(tau).discretize(dt, Discretization::ZeroOrderHold).unwrap();

        let decay = (-dt / tau).exp();
        assert_relative_eq!(d.a()[(0, 0)], decay, epsilon = 1e-12);
        assert_relative_eq!(d.b()[(0, 0)], 1.0 - decay, epsilon = 1e-12);
        assert_relative_eq!(d.dt(), dt);
    }

    #[test]
    fn first_order_hold_of_lag_matches_closed_form() {
        let (tau, dt) = (0.2, 0.05);
        let d = lag(tau).discretize(dt, Discretization::FirstOrderHold).unwrap();

        // For ẋ = a·x + b·u with a triangle hold:
        // Γ₁ = b(e^{aT} − 1)/a, Γ₂ = b(e^{aT} − 1 − aT)/(a²T),
        // B_d = Γ₁ + (e^{aT} − 1)Γ₂, D_d = c·Γ₂.
        let (a, b) = (-1.0 / tau, 1.0 / tau);
        let phi = (a * dt).exp();
        let gamma1 = b * (phi - 1.0) / a;
        let gamma2 = b * (phi - 1.0 - a * dt) / (a * a * dt);

        assert_relative_eq!(d.a()[(0, 0)], phi, epsilon = 1e-12);
        assert_relative_eq!(
            d.b()[(0, 0)],
            gamma1 + (phi - 1.0) * gamma2,
            epsilon = 1e-12
        );
        assert_relative_eq!(d.d()[(0, 0)], gamma2, epsilon = 1e-12);
        assert_relative_eq!(d.c()[(0, 0)], 1.0);
    }

    #[test]
    fn zero_order_hold_of_double_integrator() {
        let dt = 0.1;
        let d = double_integrator()
            .discretize(dt, Discretization::ZeroOrderHold)
            .unwrap();

        let expected_a = DMatrix::from_row_slice(2, 2, &[1.0, dt, 0.0, 1.0]);
        let expected_b = DMatrix::from_row_slice(2, 1, &[dt * dt / 2.0, dt]);
        assert_relative_eq!(*d.a(), expected_a, epsilon = 1e-12);
        assert_relative_eq!(*d.b(), expected_b, epsilon = 1e-12);
    }

    #[test]
    fn forward_euler() {
        let dt = 0.01;
        let sys = double_integrator();
        let d = sys.discretize(dt, Discretization::ForwardEuler).unwrap();

        let expected_a = DMatrix::<f64>::identity(2, 2) + sys.a() * dt;
        assert_relative_eq!(*d.a(), expected_a, epsilon = 1e-14);
        assert_relative_eq!(*d.b(), sys.b() * dt, epsilon = 1e-14);
        assert_eq!(d.c(), sys.c());
        assert_eq!(d.d(), sys.d());
    }

    #[test]
    fn tustin_maps_pole_through_bilinear_transform() {
        let (tau, dt) = (0.5, 0.1);
        let d = lag(tau).discretize(dt, Discretization::Tustin).unwrap();

        // s = -1/τ maps to z = (1 + s dt/2) / (1 − s dt/2).
        let s = -1.0 / tau;
        let z = (1.0 + s * dt / 2.0) / (1.0 - s * dt / 2.0);
        assert_relative_eq!(d.a()[(0, 0)], z, epsilon = 1e-12);
    }

    #[test]
    fn backward_euler_matches_gbt_one() {
        let sys = lag(0.3);
        let be = sys.discretize(0.02, Discretization::BackwardEuler).unwrap();
        let gbt = sys
            .discretize(0.02, Discretization::Gbt { alpha: 1.0 })
            .unwrap();
        assert_eq!(be, gbt);
    }

    #[test]
    fn gbt_rejects_out_of_range_alpha() {
        let err = lag(1.0)
            .discretize(0.1, Discretization::Gbt { alpha: 1.5 })
            .unwrap_err();
        assert_eq!(err, LtiError::InvalidAlpha(1.5));
    }

    #[test]
    fn every_method_preserves_dc_gain_of_lag() {
        let sys = lag(0.25);
        for method in [
            Discretization::ZeroOrderHold,
            Discretization::FirstOrderHold,
            Discretization::ForwardEuler,
            Discretization::BackwardEuler,
            Discretization::Tustin,
        ] {
            let d = sys.discretize(0.01, method).unwrap();
            let gain = d.dc_gain().unwrap();
            assert_relative_eq!(gain[(0, 0)], 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn impulse_scales_input_by_sample_time() {
        let (tau, dt) = (0.2, 0.05);
        let d = lag(tau).discretize(dt, Discretization::Impulse).unwrap();

        let decay = (-dt / tau).exp();
        assert_relative_eq!(d.a()[(0, 0)], decay, epsilon = 1e-12);
        assert_relative_eq!(d.b()[(0, 0)], decay / tau * dt, epsilon = 1e-12);
        assert_relative_eq!(d.d()[(0, 0)], dt / tau, epsilon = 1e-12);
    }

    #[test]
    fn static_gain_passes_through() {
        let sys = StateSpace::new(
            DMatrix::zeros(0, 0),
            DMatrix::zeros(0, 1),
            DMatrix::zeros(1, 0),
            DMatrix::from_element(1, 1, 2.0),
        )
        .unwrap();

        let d = sys.discretize(0.1, Discretization::Tustin).unwrap();
        assert_eq!(d.n_states(), 0);
        assert_relative_eq!(d.d()[(0, 0)], 2.0);
    }
}
