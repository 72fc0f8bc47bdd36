//! The step orchestrator (`Simulator`).
//!
//! Owns the simulation state exclusively and advances it one fixed-size tick
//! at a time: sensor-domain error, adaptive controller, command voltage,
//! disturbance shaping, plant update, telemetry append, periodic log line.

use cruise_traits::{DisturbanceSource, TargetSource};

use crate::config::{ControllerParameters, InitialConditions, PlantParameters};
use crate::controller;
use crate::disturbance::DisturbanceParameters;
use crate::logger::TickLogger;
use crate::plant;
use crate::state::SimulationState;
use crate::status::ToleranceBand;
use crate::telemetry::{TelemetryHistory, TelemetrySample};
use crate::units::ConversionParameters;

pub struct Simulator {
    pub(crate) controller: ControllerParameters,
    pub(crate) conversion: ConversionParameters,
    pub(crate) disturbance: DisturbanceParameters,
    pub(crate) plant: PlantParameters,
    pub(crate) initial: InitialConditions,
    pub(crate) dt: f64,
    pub(crate) log_every: u64,
    pub(crate) logger: Box<dyn TickLogger>,

    pub(crate) state: SimulationState,
    pub(crate) history: TelemetryHistory,
    pub(crate) ticks: u64,
}

impl core::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Simulator")
            .field("ticks", &self.ticks)
            .field("time", &self.state.time_elapsed)
            .field("target", &self.state.nominal_target)
            .field("speed", &self.state.actual_speed)
            .field("history_len", &self.history.len())
            .finish()
    }
}

impl Simulator {
    /// Advance the simulation by one tick.
    ///
    /// `target`, when present and finite, replaces the setpoint (clamped to
    /// the plant speed envelope) before anything else is computed. The raw
    /// disturbance is clamped and attenuated; out-of-range inputs are never
    /// rejected.
    pub fn tick(&mut self, disturbance: f64, target: Option<f64>) -> TelemetrySample {
        if let Some(t) = target.filter(|t| t.is_finite()) {
            self.state.nominal_target = t.clamp(self.plant.speed_min, self.plant.speed_max);
        }

        self.ticks += 1;
        let dt = self.dt;
        self.state.time_elapsed = self.ticks as f64 * dt;

        let speed = self.state.actual_speed;
        let target = self.state.nominal_target;

        // Error is measured in the sensor domain, reasoned about in km/h.
        let target_volts = self.conversion.speed_to_voltage(target);
        let speed_volts = self.conversion.speed_to_voltage(speed);
        let error_volts = target_volts - speed_volts;
        let error = self.conversion.error_to_speed(error_volts);

        let in_band_at_start = self.controller.band(target).contains(speed);

        let control = controller::compute(&self.controller, &mut self.state, error, dt);
        let command_volts = self.conversion.command_to_voltage(control.command);

        let shaped = self.disturbance.shape(disturbance);
        let out = plant::step(
            &self.plant,
            &mut self.state,
            control.command,
            shaped,
            in_band_at_start,
            dt,
        );
        self.state.samples_seen = self.state.samples_seen.saturating_add(1);

        let sample = TelemetrySample {
            tick: self.ticks,
            time: self.state.time_elapsed,
            target,
            speed: out.speed,
            feedback: out.speed,
            error_speed: target - speed,
            error_volts,
            target_volts,
            speed_volts,
            command: control.command,
            command_volts,
            p: control.p,
            i: control.i,
            d: control.d,
            correction: control.correction,
            disturbance_raw: disturbance,
            disturbance_shaped: shaped,
            actuator_command: out.actuator_command,
            actuator_real: out.actuator_real,
            in_band: self.is_in_tolerance_band(),
        };
        self.history.push(sample);

        tracing::debug!(
            tick = self.ticks,
            speed = out.speed,
            command = control.command,
            "tick complete"
        );
        if self.ticks % self.log_every == 0 {
            self.logger.log(&sample, self.tolerance_band());
        }

        sample
    }

    /// One tick with inputs pulled from live sources.
    pub fn tick_from<D, T>(&mut self, disturbance: &mut D, target: &mut T) -> TelemetrySample
    where
        D: DisturbanceSource + ?Sized,
        T: TargetSource + ?Sized,
    {
        let next = self.ticks + 1;
        let d = disturbance.disturbance(next);
        let t = target.target(next);
        self.tick(d, t)
    }

    /// Retained samples, oldest first.
    pub fn history(&self) -> &TelemetryHistory {
        &self.history
    }

    pub fn last_sample(&self) -> Option<&TelemetrySample> {
        self.history.latest()
    }

    /// Whether the current speed lies inside the band around the current target.
    pub fn is_in_tolerance_band(&self) -> bool {
        self.tolerance_band().contains(self.state.actual_speed)
    }

    pub fn tolerance_band(&self) -> ToleranceBand {
        self.controller.band(self.state.nominal_target)
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn time_elapsed(&self) -> f64 {
        self.state.time_elapsed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Restore the initial conditions and drop all telemetry.
    pub fn reset(&mut self) {
        self.state = SimulationState::new(&self.initial);
        self.history.clear();
        self.ticks = 0;
    }
}
