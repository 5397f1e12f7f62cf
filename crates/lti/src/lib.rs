//! Linear time-invariant systems for actuator analysis.
//!
//! - [`StateSpace`]: continuous `(A, B, C, D)` systems with poles, DC gain
//!   and frequency response
//! - [`Discretization`]: zero/first-order hold, impulse and the generalized
//!   bilinear family
//! - [`DiscreteStateSpace`]: sampled systems that can be stepped and simulated
//! - [`TransferFunction`]: rational SISO transfer functions in `s` or `z`

mod discrete;
mod discretize;
mod error;
mod polynomial;
mod state_space;
mod transfer_function;

pub use discrete::{DiscreteStateSpace, Response};
pub use discretize::Discretization;
pub use error::LtiError;
pub use polynomial::Polynomial;
pub use state_space::StateSpace;
pub use transfer_function::{Domain, TransferFunction};

pub use nalgebra::{Complex, DMatrix, DVector};
