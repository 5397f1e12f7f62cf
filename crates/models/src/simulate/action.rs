/// Control actions an observer may return during a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the simulation and return the trajectory so far.
    StopEarly,
}
