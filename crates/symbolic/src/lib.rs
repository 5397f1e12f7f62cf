//! Symbolic expressions for parameterized actuator dynamics.
//!
//! Actuator families describe their dynamics in terms of named parameters
//! (`J_m`, `k`, `K_t`, ...). This crate keeps those descriptions symbolic
//! until a parameter set is substituted:
//!
//! - [`Expr`]: expression trees with simplification and differentiation
//! - [`SymbolicMatrix`]: matrices of expressions and Jacobians
//! - [`SymbolicStateSpace`]: a linear system that substitutes into a
//!   numeric [`StateSpace`](actuate_lti::StateSpace)
//! - [`SymbolicDynamics`]: nonlinear `ẋ = f(x, u)` that can be linearized
//!   about an [`OperatingPoint`]

mod dynamics;
mod error;
mod expr;
mod matrix;
mod state_space;
mod substitution;

pub use dynamics::{OperatingPoint, SymbolicDynamics};
pub use error::SymbolicError;
pub use expr::{Expr, Function};
pub use matrix::SymbolicMatrix;
pub use state_space::SymbolicStateSpace;
pub use substitution::{Binding, Substitution};
