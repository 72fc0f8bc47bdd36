//! Builder for `Simulator`.
//!
//! Every parameter group has a reference default; `try_build()` validates the
//! combination once so the tick path never has to.

use crate::config::*;
use crate::core::Simulator;
use crate::disturbance::DisturbanceParameters;
use crate::error::{BuildError, Result};
use crate::logger::{TickLogger, TracingLogger};
use crate::state::SimulationState;
use crate::telemetry::TelemetryHistory;
use crate::units::ConversionParameters;

impl Simulator {
    /// Start building a Simulator.
    pub fn builder() -> SimulatorBuilder {
        SimulatorBuilder::default()
    }

    /// Reference configuration throughout.
    pub fn with_defaults() -> Result<Self> {
        SimulatorBuilder::default().try_build()
    }
}

#[derive(Default)]
pub struct SimulatorBuilder {
    controller: Option<ControllerParameters>,
    conversion: Option<ConversionParameters>,
    disturbance: Option<DisturbanceParameters>,
    plant: Option<PlantParameters>,
    initial: Option<InitialConditions>,
    simulation: Option<SimulationCfg>,
    logger: Option<Box<dyn TickLogger>>,
}

impl SimulatorBuilder {
    pub fn with_controller(mut self, c: ControllerParameters) -> Self {
        self.controller = Some(c);
        self
    }

    pub fn with_conversion(mut self, c: ConversionParameters) -> Self {
        self.conversion = Some(c);
        self
    }

    pub fn with_disturbance(mut self, d: DisturbanceParameters) -> Self {
        self.disturbance = Some(d);
        self
    }

    pub fn with_plant(mut self, p: PlantParameters) -> Self {
        self.plant = Some(p);
        self
    }

    pub fn with_initial(mut self, i: InitialConditions) -> Self {
        self.initial = Some(i);
        self
    }

    pub fn with_simulation(mut self, s: SimulationCfg) -> Self {
        self.simulation = Some(s);
        self
    }

    /// Shorthand for overriding only the time step.
    pub fn with_dt(mut self, dt: f64) -> Self {
        let mut s = self.simulation.take().unwrap_or_default();
        s.dt = dt;
        self.simulation = Some(s);
        self
    }

    pub fn with_logger(mut self, logger: impl TickLogger + 'static) -> Self {
        self.logger = Some(Box::new(logger));
        self
    }

    /// Validate the configuration and construct the simulator.
    pub fn try_build(self) -> Result<Simulator> {
        validate_and_build(
            self.controller.unwrap_or_default(),
            self.conversion.unwrap_or_default(),
            self.disturbance.unwrap_or_default(),
            self.plant.unwrap_or_default(),
            self.initial.unwrap_or_default(),
            self.simulation.unwrap_or_default(),
            self.logger.unwrap_or_else(|| Box::new(TracingLogger)),
        )
    }
}

fn invalid(msg: &'static str) -> eyre::Report {
    eyre::Report::new(BuildError::InvalidConfig(msg))
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// Single source of truth for validation and construction.
fn validate_and_build(
    controller: ControllerParameters,
    conversion: ConversionParameters,
    disturbance: DisturbanceParameters,
    plant: PlantParameters,
    mut initial: InitialConditions,
    simulation: SimulationCfg,
    logger: Box<dyn TickLogger>,
) -> Result<Simulator> {
    // ── Validation ───────────────────────────────────────────────────────────
    if !(simulation.dt.is_finite() && simulation.dt > 0.0) {
        return Err(eyre::Report::new(BuildError::NonPositiveDt(simulation.dt)));
    }
    if simulation.history_capacity == 0 {
        return Err(eyre::Report::new(BuildError::InvalidHistory));
    }
    if simulation.log_every == 0 {
        return Err(invalid("log_every must be >= 1"));
    }

    let c = &controller;
    if !all_finite(&[
        c.kp,
        c.ki,
        c.kd,
        c.band_offset_min,
        c.band_offset_max,
        c.above_band_gain,
        c.below_band_gain,
        c.near_edge_gain,
        c.near_edge_margin,
        c.integral_window,
        c.integral_rate,
        c.integral_limit,
        c.integral_decay,
        c.prediction_trigger,
        c.prediction_reference,
        c.overshoot_gain,
        c.undershoot_gain,
        c.zone_margin,
    ]) {
        return Err(invalid("controller parameters must be finite"));
    }
    if c.band_offset_min > c.band_offset_max {
        return Err(invalid("band_offset_min must be <= band_offset_max"));
    }
    if c.integral_limit < 0.0 {
        return Err(invalid("integral_limit must be >= 0"));
    }
    if !(0.0..=1.0).contains(&c.integral_decay) {
        return Err(invalid("integral_decay must be in [0.0, 1.0]"));
    }
    for (lo, hi) in [c.above_zone_limits, c.below_zone_limits, c.normal_limits] {
        if !(lo.is_finite() && hi.is_finite()) || lo > hi {
            return Err(invalid("command limits must be finite with min <= max"));
        }
    }

    if !all_finite(&[
        conversion.speed_min,
        conversion.speed_max,
        conversion.volt_min,
        conversion.volt_max,
        conversion.neutral_volts,
        conversion.command_range,
    ]) {
        return Err(invalid("conversion parameters must be finite"));
    }
    if conversion.speed_min > conversion.speed_max || conversion.volt_min > conversion.volt_max {
        return Err(invalid("conversion ranges must have min <= max"));
    }

    if !all_finite(&[disturbance.min, disturbance.max, disturbance.attenuation])
        || disturbance.min > disturbance.max
    {
        return Err(invalid("disturbance range must be finite with min <= max"));
    }

    if !all_finite(&[
        plant.actuator_nominal,
        plant.actuator_min,
        plant.actuator_max,
        plant.speed_min,
        plant.speed_max,
        plant.actuator_gain,
        plant.out_of_band_boost,
    ]) {
        return Err(invalid("plant parameters must be finite"));
    }
    if plant.actuator_nominal <= 0.0 {
        return Err(invalid("actuator_nominal must be > 0"));
    }
    if plant.actuator_min > plant.actuator_max {
        return Err(invalid("actuator_min must be <= actuator_max"));
    }
    if plant.speed_min > plant.speed_max {
        return Err(invalid("speed_min must be <= speed_max"));
    }

    if !all_finite(&[initial.speed, initial.actuator, initial.target]) {
        return Err(invalid("initial conditions must be finite"));
    }

    // ── Normalize ────────────────────────────────────────────────────────────
    initial.speed = initial.speed.clamp(plant.speed_min, plant.speed_max);
    initial.target = initial.target.clamp(plant.speed_min, plant.speed_max);
    initial.actuator = initial
        .actuator
        .clamp(plant.actuator_min, plant.actuator_max);

    let state = SimulationState::new(&initial);
    let history = TelemetryHistory::new(simulation.history_capacity);

    tracing::debug!(
        dt = simulation.dt,
        history_capacity = simulation.history_capacity,
        speed = initial.speed,
        target = initial.target,
        "simulator built"
    );

    Ok(Simulator {
        controller,
        conversion,
        disturbance,
        plant,
        initial,
        dt: simulation.dt,
        log_every: simulation.log_every,
        logger,
        state,
        history,
        ticks: 0,
    })
}
