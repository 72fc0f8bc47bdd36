//! Configuration types for the simulation kernel.
//!
//! These are the runtime parameter structs used by `Simulator`. They are
//! separate from the TOML-deserialized config in `cruise_config`; the
//! `conversions` module bridges the two. Defaults are the reference tuning.

/// Gains, scheduling multipliers and saturation limits of the adaptive
/// controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerParameters {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,

    /// Tolerance band lower offset relative to the target (km/h, negative).
    pub band_offset_min: f64,
    /// Tolerance band upper offset relative to the target (km/h).
    pub band_offset_max: f64,

    /// Proportional gain multiplier when above the band.
    pub above_band_gain: f64,
    /// Proportional gain multiplier when below the band.
    pub below_band_gain: f64,
    /// Proportional gain multiplier in band but away from the target.
    pub near_edge_gain: f64,
    /// In-band deviation from the target beyond which `near_edge_gain` applies.
    pub near_edge_margin: f64,

    /// Integral only accumulates while `|error|` is below this (km/h).
    pub integral_window: f64,
    /// Extra scale on `error * dt` when accumulating.
    pub integral_rate: f64,
    /// Symmetric bound on the accumulator.
    pub integral_limit: f64,
    /// Geometric decay factor applied per ineligible tick.
    pub integral_decay: f64,

    /// Projected speed must clear the band by this much to trigger a correction.
    pub prediction_trigger: f64,
    /// Excess and deficit are measured from the band edge widened by this.
    pub prediction_reference: f64,
    /// Gain on the projected excess above the band.
    pub overshoot_gain: f64,
    /// Gain on the projected deficit below the band.
    pub undershoot_gain: f64,

    /// Distance beyond a band edge that selects the tight saturation zone.
    pub zone_margin: f64,
    /// Command limits when the speed is well above the band.
    pub above_zone_limits: (f64, f64),
    /// Command limits when the speed is well below the band.
    pub below_zone_limits: (f64, f64),
    /// Command limits otherwise.
    pub normal_limits: (f64, f64),
}

impl Default for ControllerParameters {
    fn default() -> Self {
        Self {
            kp: 4.0,
            ki: 0.2,
            kd: 0.8,
            band_offset_min: -2.0,
            band_offset_max: 1.0,
            above_band_gain: 1.5,
            below_band_gain: 1.3,
            near_edge_gain: 0.7,
            near_edge_margin: 0.3,
            integral_window: 1.0,
            integral_rate: 0.02,
            integral_limit: 2.0,
            integral_decay: 0.9,
            prediction_trigger: 0.3,
            prediction_reference: 0.2,
            overshoot_gain: 10.0,
            undershoot_gain: 6.0,
            zone_margin: 0.2,
            above_zone_limits: (-30.0, 5.0),
            below_zone_limits: (-5.0, 20.0),
            normal_limits: (-25.0, 25.0),
        }
    }
}

/// Actuator and speed envelope of the powertrain model.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantParameters {
    /// Actuator value (RPM) that yields exactly the target speed.
    pub actuator_nominal: f64,
    pub actuator_min: f64,
    pub actuator_max: f64,
    /// Operating envelope for the observable speed (km/h).
    pub speed_min: f64,
    pub speed_max: f64,
    /// RPM per second per unit of command.
    pub actuator_gain: f64,
    /// Gain multiplier while the speed is outside the tolerance band.
    pub out_of_band_boost: f64,
}

impl Default for PlantParameters {
    fn default() -> Self {
        Self {
            actuator_nominal: 5500.0,
            actuator_min: 4700.0,
            actuator_max: 6300.0,
            speed_min: 50.0,
            speed_max: 100.0,
            actuator_gain: 18.0,
            out_of_band_boost: 1.3,
        }
    }
}

/// Starting point of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialConditions {
    pub speed: f64,
    /// Applied to both the command accumulator and the real actuator value.
    pub actuator: f64,
    pub target: f64,
}

impl Default for InitialConditions {
    fn default() -> Self {
        Self {
            speed: 70.0,
            actuator: 4812.0,
            target: 80.0,
        }
    }
}

/// Stepping and bookkeeping configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationCfg {
    /// Simulated seconds per tick. Must be > 0.
    pub dt: f64,
    /// Telemetry samples retained.
    pub history_capacity: usize,
    /// Emit a log line every N ticks.
    pub log_every: u64,
}

impl Default for SimulationCfg {
    fn default() -> Self {
        Self {
            dt: 0.1,
            history_capacity: 150,
            log_every: 5,
        }
    }
}
