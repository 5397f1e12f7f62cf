//! Actuator families used by the unit tests.

use actuate_core::{ActuatorParameters, parameters::names};
use actuate_symbolic::{Expr, OperatingPoint, SymbolicDynamics, SymbolicStateSpace};

use crate::{ActuatorModel, InputKind, ModelError, NonlinearActuatorModel};

/// A series elastic actuator driven by an output-side torque.
///
/// States are the motor angle reflected to the output `theta`, the load
/// angle `q_l` and their rates. Outputs are the load angle and the spring
/// torque `tau_s = k (theta - q_l)`.
pub(crate) struct TorqueSea {
    params: ActuatorParameters,
}

impl TorqueSea {
    pub(crate) fn new(params: ActuatorParameters) -> Self {
        Self { params }
    }
}

fn sym(name: &str) -> Expr {
    Expr::symbol(name)
}

impl ActuatorModel for TorqueSea {
    fn parameters(&self) -> &ActuatorParameters {
        &self.params
    }

    fn symbolic_state_space(&self) -> Result<SymbolicStateSpace, ModelError> {
        self.symbolic_linearization(&OperatingPoint::origin(4, 1))
    }
}

impl NonlinearActuatorModel for TorqueSea {
    fn symbolic_dynamics(&self) -> Result<SymbolicDynamics, ModelError> {
        let (theta, q_l, dtheta, dq_l) = (sym("theta"), sym("q_l"), sym("dtheta"), sym("dq_l"));
        let tau = sym("tau");

        let n2 = sym(names::GEAR_RATIO).pow(2);
        let reflected = (sym(names::MOTOR_INERTIA) + sym(names::GEAR_INERTIA)) * &n2;
        let k = sym(names::SPRING_STIFFNESS);
        let spring = &k * (&theta - &q_l) + sym(names::SPRING_DAMPING) * (&dtheta - &dq_l);

        let motor_accel = (tau - &spring - sym(names::MOTOR_DAMPING) * &n2 * &dtheta) / reflected;
        let load_accel =
            (&spring - sym(names::LOAD_DAMPING) * &dq_l) / sym(names::LOAD_INERTIA);

        Ok(SymbolicDynamics::new(
            &["theta", "q_l", "dtheta", "dq_l"],
            &["tau"],
            &["q_l", "tau_s"],
            vec![dtheta.clone(), dq_l.clone(), motor_accel, load_accel],
            vec![q_l.clone(), k * (theta - q_l)],
        )?)
    }

    fn input_kinds(&self) -> Result<Vec<InputKind>, ModelError> {
        Ok(vec![InputKind::Torque])
    }
}
