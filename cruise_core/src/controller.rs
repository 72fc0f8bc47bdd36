//! Adaptive speed controller.
//!
//! A PID law with three additions:
//! - gain scheduling on the tolerance-band zone (stronger outside, softer
//!   near the band edges),
//! - a gated integral that only accumulates close to the target and decays
//!   geometrically otherwise (anti-windup),
//! - a one-step-ahead projection of the speed that adds a corrective term
//!   before an overshoot happens.
//!
//! The final command is clamped to zone-dependent, asymmetric limits: near
//! the top of the band the controller may not push harder upward, near the
//! bottom it may not pull harder downward.

use crate::config::ControllerParameters;
use crate::state::SimulationState;
use crate::status::{BandZone, ToleranceBand};

/// Result of one controller evaluation. Only `command` drives the plant;
/// the decomposition is reported for telemetry.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlOutput {
    pub command: f64,
    pub p: f64,
    pub i: f64,
    pub d: f64,
    pub correction: f64,
}

impl ControllerParameters {
    /// Tolerance band around `target`.
    #[inline]
    pub fn band(&self, target: f64) -> ToleranceBand {
        ToleranceBand::around(target, self.band_offset_min, self.band_offset_max)
    }
}

/// Evaluate the control law for one tick.
///
/// `error` is the target-minus-speed error already converted to km/h.
/// Updates `trend`, `speed_previous`, `integral` and `error_previous` in
/// `state`; nothing else is touched.
pub fn compute(
    params: &ControllerParameters,
    state: &mut SimulationState,
    error: f64,
    dt: f64,
) -> ControlOutput {
    let speed = state.actual_speed;
    let target = state.nominal_target;
    let band = params.band(target);
    let zone = band.zone(speed);

    // Trend
    if state.samples_seen >= 2 && dt > 0.0 {
        state.trend = (speed - state.speed_previous) / dt;
    }
    state.speed_previous = speed;

    // Gain-scheduled proportional
    let (effective_error, kp) = match zone {
        BandZone::Above => (target - speed, params.kp * params.above_band_gain),
        BandZone::Below => (target - speed, params.kp * params.below_band_gain),
        BandZone::InBand => {
            let mut kp = params.kp;
            if (speed - target).abs() > params.near_edge_margin {
                kp *= params.near_edge_gain;
            }
            (error, kp)
        }
    };
    let p = kp * effective_error;

    // Gated integral
    if zone == BandZone::InBand && error.abs() < params.integral_window {
        state.integral += error * dt * params.integral_rate;
        state.integral = state
            .integral
            .clamp(-params.integral_limit, params.integral_limit);
    } else {
        state.integral *= params.integral_decay;
    }
    let i = params.ki * state.integral;

    let d = if dt > 0.0 {
        params.kd * (error - state.error_previous) / dt
    } else {
        0.0
    };

    let correction = predictive_correction(params, &band, speed + state.trend * dt);

    let command = saturate(params, &band, speed, p + i + d + correction);

    state.error_previous = error;

    tracing::trace!(
        speed,
        target,
        p,
        i,
        d,
        correction,
        command,
        "controller step"
    );

    ControlOutput {
        command,
        p,
        i,
        d,
        correction,
    }
}

/// Corrective term for a projected boundary crossing; 0 when the projection
/// stays within the trigger margins.
pub fn predictive_correction(
    params: &ControllerParameters,
    band: &ToleranceBand,
    projected: f64,
) -> f64 {
    if projected > band.max + params.prediction_trigger {
        let excess = projected - (band.max + params.prediction_reference);
        -excess * params.overshoot_gain
    } else if projected < band.min - params.prediction_trigger {
        let deficit = (band.min - params.prediction_reference) - projected;
        deficit * params.undershoot_gain
    } else {
        0.0
    }
}

/// Clamp a raw command to the limits of the zone the speed is in.
pub fn saturate(
    params: &ControllerParameters,
    band: &ToleranceBand,
    speed: f64,
    command: f64,
) -> f64 {
    let (lo, hi) = if speed > band.max + params.zone_margin {
        params.above_zone_limits
    } else if speed < band.min - params.zone_margin {
        params.below_zone_limits
    } else {
        params.normal_limits
    };
    command.clamp(lo, hi)
}
