use thiserror::Error;

/// Fixed-step integration scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub enum Method {
    /// Explicit Euler, first order.
    ForwardEuler,

    /// Classical fourth-order Runge-Kutta.
    #[default]
    RungeKutta4,
}

/// Configuration for a fixed-step simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    dt: f64,
    steps: usize,
    method: Method,
    saturate_inputs: bool,
}

/// Errors that can occur when validating a simulation config.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("dt must be finite and positive, got {0}")]
    Dt(f64),
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(1e-3, 1000, Method::default()).unwrap()
    }
}

impl Config {
    /// Creates a new config with a validated step size.
    ///
    /// Input saturation is off; enable it with
    /// [`with_saturation`](Self::with_saturation).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Dt`] if `dt` is not finite and positive.
    pub fn new(dt: f64, steps: usize, method: Method) -> Result<Self, ConfigError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ConfigError::Dt(dt));
        }

        Ok(Self {
            dt,
            steps,
            method,
            saturate_inputs: false,
        })
    }

    /// Returns the config with input saturation switched on or off.
    ///
    /// Saturated inputs are clamped to the limit of their
    /// [`InputKind`](crate::InputKind).
    #[must_use]
    pub fn with_saturation(self, saturate_inputs: bool) -> Self {
        Self {
            saturate_inputs,
            ..self
        }
    }

    /// Returns the step size in seconds.
    #[must_use]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Returns the number of integration steps.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    #[must_use]
    pub fn saturate_inputs(&self) -> bool {
        self.saturate_inputs
    }

    /// Returns the simulated duration, `dt * steps`.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.dt * self.steps as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn rejects_bad_step_sizes() {
        assert_eq!(Config::new(0.0, 10, Method::ForwardEuler), Err(ConfigError::Dt(0.0)));
        assert!(Config::new(-1e-3, 10, Method::ForwardEuler).is_err());
        assert!(Config::new(f64::NAN, 10, Method::RungeKutta4).is_err());
        assert!(Config::new(f64::INFINITY, 10, Method::RungeKutta4).is_err());
    }

    #[test]
    fn defaults_and_builders() {
        let config = Config::default();
        assert_eq!(config.method(), Method::RungeKutta4);
        assert!(!config.saturate_inputs());
        assert_relative_eq!(config.duration(), 1.0);

        let config = Config::new(0.01, 50, Method::ForwardEuler)
            .unwrap()
            .with_saturation(true);
        assert!(config.saturate_inputs());
        assert_eq!(config.steps(), 50);
        assert_relative_eq!(config.duration(), 0.5);
    }
}
