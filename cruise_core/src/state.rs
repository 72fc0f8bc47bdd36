//! Mutable simulation state, owned by the orchestrator.

use crate::config::InitialConditions;

/// Everything that changes from one tick to the next.
///
/// Invariants (upheld by `controller::compute` and `plant::step`):
/// - `actual_speed` within the plant speed bounds
/// - `actuator_command` and `actuator_real` within the actuator bounds
/// - `|integral| <= ControllerParameters::integral_limit`
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    /// Simulated seconds since start; grows by `dt` per tick.
    pub time_elapsed: f64,
    /// Speed setpoint (km/h).
    pub nominal_target: f64,
    /// Observable speed (km/h).
    pub actual_speed: f64,
    /// Integrated actuator quantity before the disturbance (RPM).
    pub actuator_command: f64,
    /// Actuator quantity after the disturbance (RPM).
    pub actuator_real: f64,
    /// Last tick's error in km/h, for the derivative term.
    pub error_previous: f64,
    /// Anti-windup limited error accumulator.
    pub integral: f64,
    /// Speed at the start of the previous tick.
    pub speed_previous: f64,
    /// Last trend estimate (km/h per second).
    pub trend: f64,
    /// Speed samples observed so far, the initial condition included.
    pub samples_seen: u64,
}

impl SimulationState {
    pub fn new(initial: &InitialConditions) -> Self {
        Self {
            time_elapsed: 0.0,
            nominal_target: initial.target,
            actual_speed: initial.speed,
            actuator_command: initial.actuator,
            actuator_real: initial.actuator,
            error_previous: 0.0,
            integral: 0.0,
            speed_previous: initial.speed,
            trend: 0.0,
            samples_seen: 1,
        }
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(&InitialConditions::default())
    }
}
