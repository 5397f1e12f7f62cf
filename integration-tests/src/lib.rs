//! Actuator families used by the integration tests.
//!
//! Each family supplies only its equations; everything else comes from the
//! provided methods of [`ActuatorModel`](actuate_models::ActuatorModel) and
//! [`NonlinearActuatorModel`].

use actuate_core::parameters::names;
use actuate_models::{ModelError, NonlinearActuatorModel, OperatingPoint};
use actuate_symbolic::Expr;

fn sym(name: &str) -> Expr {
    Expr::symbol(name)
}

/// `(J_m + J_g) N²`, the motor and gear inertia seen from the output.
fn reflected_inertia() -> Expr {
    (sym(names::MOTOR_INERTIA) + sym(names::GEAR_INERTIA)) * sym(names::GEAR_RATIO).pow(2)
}

/// `d_m N²`, motor damping seen from the output.
fn reflected_motor_damping() -> Expr {
    sym(names::MOTOR_DAMPING) * sym(names::GEAR_RATIO).pow(2)
}

pub mod rigid {
    use actuate_core::{ActuatorParameters, parameters::names};
    use actuate_models::{ActuatorModel, ModelError};
    use actuate_symbolic::{Expr, SymbolicMatrix, SymbolicStateSpace};

    use super::{reflected_inertia, reflected_motor_damping, sym};

    /// A geared motor rigidly coupled to its load, driven by winding current.
    ///
    /// The spring is ignored: motor, gear and load move as one inertia.
    /// States are the joint angle `q` and rate `dq`; the output is `q`.
    pub struct RigidJoint {
        params: ActuatorParameters,
    }

    impl RigidJoint {
        #[must_use]
        pub fn new(params: ActuatorParameters) -> Self {
            Self { params }
        }
    }

    impl ActuatorModel for RigidJoint {
        fn parameters(&self) -> &ActuatorParameters {
            &self.params
        }

        fn symbolic_state_space(&self) -> Result<SymbolicStateSpace, ModelError> {
            let inertia = reflected_inertia() + sym(names::LOAD_INERTIA);
            let damping = reflected_motor_damping() + sym(names::LOAD_DAMPING);
            let gain = sym(names::TORQUE_CONSTANT) * sym(names::GEAR_RATIO);

            let a = SymbolicMatrix::from_rows(vec![
                vec![Expr::zero(), Expr::one()],
                vec![Expr::zero(), -(damping / &inertia)],
            ])?;
            let b = SymbolicMatrix::column(vec![Expr::zero(), gain / inertia]);
            let c = SymbolicMatrix::from_rows(vec![vec![Expr::one(), Expr::zero()]])?;

            Ok(SymbolicStateSpace::new(
                a,
                b,
                c,
                SymbolicMatrix::zeros(1, 1),
                &["q", "dq"],
                &["i"],
                &["q"],
            )?)
        }
    }
}

pub mod electric {
    use actuate_core::{ActuatorParameters, parameters::names};
    use actuate_models::{
        ActuatorModel, InputKind, ModelError, NonlinearActuatorModel, OperatingPoint,
    };
    use actuate_symbolic::{SymbolicDynamics, SymbolicStateSpace};

    use super::{reflected_inertia, reflected_motor_damping, sym};

    /// A voltage-driven series elastic actuator including winding dynamics.
    ///
    /// States are the motor angle reflected to the output `theta`, the load
    /// angle `q_l`, their rates and the winding current `i`. Outputs are the
    /// load angle, the spring torque and the current.
    pub struct ElectricSea {
        params: ActuatorParameters,
    }

    impl ElectricSea {
        pub const STATES: [&'static str; 5] = ["theta", "q_l", "dtheta", "dq_l", "i"];

        #[must_use]
        pub fn new(params: ActuatorParameters) -> Self {
            Self { params }
        }
    }

    impl ActuatorModel for ElectricSea {
        fn parameters(&self) -> &ActuatorParameters {
            &self.params
        }

        fn symbolic_state_space(&self) -> Result<SymbolicStateSpace, ModelError> {
            self.symbolic_linearization(&OperatingPoint::origin(5, 1))
        }
    }

    impl NonlinearActuatorModel for ElectricSea {
        fn symbolic_dynamics(&self) -> Result<SymbolicDynamics, ModelError> {
            let [theta, q_l, dtheta, dq_l, i] = Self::STATES.map(sym);
            let n = sym(names::GEAR_RATIO);
            let k = sym(names::SPRING_STIFFNESS);

            let spring = &k * (&theta - &q_l) + sym(names::SPRING_DAMPING) * (&dtheta - &dq_l);
            let motor_torque = sym(names::TORQUE_CONSTANT) * &n * &i;
            let back_emf = sym(names::BACK_EMF_CONSTANT) * &n * &dtheta;

            let motor_damping = reflected_motor_damping() * &dtheta;
            let motor_accel = (motor_torque - &spring - motor_damping) / reflected_inertia();
            let load_accel =
                (&spring - sym(names::LOAD_DAMPING) * &dq_l) / sym(names::LOAD_INERTIA);
            let current_rate = (sym("U") - sym(names::RESISTANCE) * &i - back_emf)
                / sym(names::INDUCTANCE);

            Ok(SymbolicDynamics::new(
                &Self::STATES,
                &["U"],
                &["q_l", "tau_s", "i"],
                vec![dtheta, dq_l, motor_accel, load_accel, current_rate],
                vec![q_l.clone(), k * (theta - q_l), i],
            )?)
        }

        fn input_kinds(&self) -> Result<Vec<InputKind>, ModelError> {
            Ok(vec![InputKind::Voltage])
        }
    }
}

pub mod progressive {
    use actuate_core::{ActuatorParameters, parameters::names};
    use actuate_models::{
        ActuatorModel, InputKind, ModelError, NonlinearActuatorModel, OperatingPoint,
    };
    use actuate_symbolic::{SymbolicDynamics, SymbolicStateSpace};

    use super::{reflected_inertia, reflected_motor_damping, sym};

    /// A torque-driven joint whose spring stiffens with deflection.
    ///
    /// The spring torque is `k δ + (k_max − k) δ³ / 3` for a twist
    /// `δ = theta − q_l`, so the local stiffness rises from `k` at rest to
    /// `k_max` at one radian. Needs a parameter set with a stiffness range.
    pub struct ProgressiveSpringJoint {
        params: ActuatorParameters,
    }

    impl ProgressiveSpringJoint {
        #[must_use]
        pub fn new(params: ActuatorParameters) -> Self {
            Self { params }
        }
    }

    impl ActuatorModel for ProgressiveSpringJoint {
        fn parameters(&self) -> &ActuatorParameters {
            &self.params
        }

        fn symbolic_state_space(&self) -> Result<SymbolicStateSpace, ModelError> {
            self.symbolic_linearization(&OperatingPoint::origin(4, 1))
        }
    }

    impl NonlinearActuatorModel for ProgressiveSpringJoint {
        fn symbolic_dynamics(&self) -> Result<SymbolicDynamics, ModelError> {
            let [theta, q_l, dtheta, dq_l] = ["theta", "q_l", "dtheta", "dq_l"].map(sym);
            let k = sym(names::SPRING_STIFFNESS);
            let twist = &theta - &q_l;

            let spring_torque = &k * &twist
                + (sym(names::STIFFNESS_MAX) - &k) * twist.clone().pow(3) / 3.0;
            let spring = &spring_torque + sym(names::SPRING_DAMPING) * (&dtheta - &dq_l);

            let motor_damping = reflected_motor_damping() * &dtheta;
            let motor_accel = (sym("tau") - &spring - motor_damping) / reflected_inertia();
            let load_accel =
                (spring - sym(names::LOAD_DAMPING) * &dq_l) / sym(names::LOAD_INERTIA);

            Ok(SymbolicDynamics::new(
                &["theta", "q_l", "dtheta", "dq_l"],
                &["tau"],
                &["q_l", "tau_s"],
                vec![dtheta, dq_l, motor_accel, load_accel],
                vec![q_l, spring_torque],
            )?)
        }

        fn input_kinds(&self) -> Result<Vec<InputKind>, ModelError> {
            Ok(vec![InputKind::Torque])
        }
    }
}

pub use electric::ElectricSea;
pub use progressive::ProgressiveSpringJoint;
pub use rigid::RigidJoint;

/// Returns the highest damped natural frequency, in rad/s, among a
/// nonlinear family's poles when linearized at rest.
///
/// # Errors
///
/// Returns an error if the family cannot be linearized.
pub fn resonance<M: NonlinearActuatorModel>(model: &M) -> Result<f64, ModelError> {
    let n_states = model.state_names()?.len();
    let n_inputs = model.input_names()?.len();
    let linear = model.linearize(&OperatingPoint::origin(n_states, n_inputs))?;
    Ok(linear.poles().iter().map(|p| p.im.abs()).fold(0.0, f64::max))
}
