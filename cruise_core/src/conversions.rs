//! `From` implementations bridging `cruise_config` types to `cruise_core` types.

use crate::config::{ControllerParameters, InitialConditions, PlantParameters, SimulationCfg};
use crate::disturbance::DisturbanceParameters;
use crate::schedule::{Schedule, ScheduleStep};
use crate::units::ConversionParameters;

// ── Controller ───────────────────────────────────────────────────────────────

impl From<&cruise_config::ControllerCfg> for ControllerParameters {
    fn from(c: &cruise_config::ControllerCfg) -> Self {
        Self {
            kp: c.kp,
            ki: c.ki,
            kd: c.kd,
            band_offset_min: c.band_offset_min,
            band_offset_max: c.band_offset_max,
            above_band_gain: c.above_band_gain,
            below_band_gain: c.below_band_gain,
            near_edge_gain: c.near_edge_gain,
            near_edge_margin: c.near_edge_margin,
            integral_window: c.integral_window,
            integral_rate: c.integral_rate,
            integral_limit: c.integral_limit,
            integral_decay: c.integral_decay,
            prediction_trigger: c.prediction_trigger,
            prediction_reference: c.prediction_reference,
            overshoot_gain: c.overshoot_gain,
            undershoot_gain: c.undershoot_gain,
            zone_margin: c.zone_margin,
            above_zone_limits: c.above_zone_limits,
            below_zone_limits: c.below_zone_limits,
            normal_limits: c.normal_limits,
        }
    }
}

// ── Conversion ───────────────────────────────────────────────────────────────

impl From<&cruise_config::ConversionCfg> for ConversionParameters {
    fn from(c: &cruise_config::ConversionCfg) -> Self {
        Self {
            speed_min: c.speed_min,
            speed_max: c.speed_max,
            volt_min: c.volt_min,
            volt_max: c.volt_max,
            neutral_volts: c.neutral_volts,
            command_range: c.command_range,
        }
    }
}

// ── Disturbance ──────────────────────────────────────────────────────────────

impl From<&cruise_config::DisturbanceCfg> for DisturbanceParameters {
    fn from(c: &cruise_config::DisturbanceCfg) -> Self {
        Self {
            min: c.min,
            max: c.max,
            attenuation: c.attenuation,
        }
    }
}

// ── Plant ────────────────────────────────────────────────────────────────────

impl From<&cruise_config::PlantCfg> for PlantParameters {
    fn from(c: &cruise_config::PlantCfg) -> Self {
        Self {
            actuator_nominal: c.actuator_nominal,
            actuator_min: c.actuator_min,
            actuator_max: c.actuator_max,
            speed_min: c.speed_min,
            speed_max: c.speed_max,
            actuator_gain: c.actuator_gain,
            out_of_band_boost: c.out_of_band_boost,
        }
    }
}

// ── Initial conditions / stepping ────────────────────────────────────────────

impl From<&cruise_config::InitialCfg> for InitialConditions {
    fn from(c: &cruise_config::InitialCfg) -> Self {
        Self {
            speed: c.speed,
            actuator: c.actuator,
            target: c.target,
        }
    }
}

impl From<&cruise_config::SimulationCfg> for SimulationCfg {
    fn from(c: &cruise_config::SimulationCfg) -> Self {
        Self {
            dt: c.dt,
            history_capacity: c.history_capacity,
            log_every: c.log_every,
        }
    }
}

// ── Scenario ─────────────────────────────────────────────────────────────────

impl From<&cruise_config::ScenarioRow> for ScheduleStep {
    fn from(r: &cruise_config::ScenarioRow) -> Self {
        Self {
            at_tick: r.tick,
            disturbance: r.disturbance,
            target: r.target,
        }
    }
}

impl crate::Simulator {
    /// Build a simulator from a validated TOML config.
    pub fn from_config(cfg: &cruise_config::Config) -> crate::error::Result<Self> {
        Self::builder()
            .with_controller((&cfg.controller).into())
            .with_conversion((&cfg.conversion).into())
            .with_disturbance((&cfg.disturbance).into())
            .with_plant((&cfg.plant).into())
            .with_initial((&cfg.initial).into())
            .with_simulation((&cfg.simulation).into())
            .try_build()
    }
}

impl Schedule {
    /// Build a schedule from scenario CSV rows.
    pub fn from_rows(rows: &[cruise_config::ScenarioRow]) -> crate::error::Result<Self> {
        Self::new(rows.iter().map(ScheduleStep::from).collect())
    }
}
