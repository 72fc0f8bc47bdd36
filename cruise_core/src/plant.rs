//! Powertrain model: the command integrates into an actuator speed (RPM),
//! the shaped disturbance adds on top, and the vehicle speed follows the
//! actuator linearly relative to the nominal operating point.

use crate::config::PlantParameters;
use crate::state::SimulationState;

/// Post-step plant quantities.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlantOutput {
    pub actuator_command: f64,
    pub actuator_real: f64,
    pub speed: f64,
}

/// Advance the plant by one tick and write the result back into `state`.
///
/// `in_band` must be evaluated on the start-of-tick speed: the actuator
/// responds faster while the controller is still outside the band.
pub fn step(
    params: &PlantParameters,
    state: &mut SimulationState,
    command: f64,
    shaped_disturbance: f64,
    in_band: bool,
    dt: f64,
) -> PlantOutput {
    let mut gain = params.actuator_gain;
    if !in_band {
        gain *= params.out_of_band_boost;
    }
    let delta = command * gain;

    state.actuator_command = (state.actuator_command + delta * dt)
        .clamp(params.actuator_min, params.actuator_max);
    state.actuator_real = (state.actuator_command + shaped_disturbance)
        .clamp(params.actuator_min, params.actuator_max);

    let speed = if params.actuator_nominal > 0.0 {
        state.actuator_real / params.actuator_nominal * state.nominal_target
    } else {
        params.speed_min
    };
    state.actual_speed = speed.clamp(params.speed_min, params.speed_max);

    PlantOutput {
        actuator_command: state.actuator_command,
        actuator_real: state.actuator_real,
        speed: state.actual_speed,
    }
}
