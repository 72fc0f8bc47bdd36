//! Paced tick loop.
//!
//! `run` drives a `Simulator` at a fixed wall-clock interval on any `Clock`,
//! pulling the live inputs once per tick and handing each sample to a
//! caller-supplied callback. It stops when the tick budget is spent or the
//! shutdown flag is raised.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use cruise_traits::{Clock, DisturbanceSource, TargetSource};

use crate::core::Simulator;
use crate::error::{Result, SimError};
use crate::telemetry::TelemetrySample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParams {
    /// Tick budget; `None` runs until shutdown.
    pub ticks: Option<u64>,
    /// Wall-clock spacing between tick starts. Zero disables pacing.
    pub interval: Duration,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            ticks: None,
            interval: Duration::from_millis(100),
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub final_sample: Option<TelemetrySample>,
    /// Simulated time of the first sample from which every later sample
    /// stayed in band. `None` if the run ended out of band.
    pub settled_at: Option<f64>,
    /// Largest `|speed - target|` seen (km/h).
    pub max_abs_deviation: f64,
    /// Ticks whose computation took longer than the interval.
    pub missed_deadlines: u64,
    pub max_latency_us: u64,
}

#[derive(Debug, Default)]
struct Tracker {
    ticks: u64,
    final_sample: Option<TelemetrySample>,
    settled_at: Option<f64>,
    max_abs_deviation: f64,
    missed_deadlines: u64,
    max_latency_us: u64,
}

impl Tracker {
    fn observe(&mut self, s: &TelemetrySample) {
        self.ticks += 1;
        self.final_sample = Some(*s);
        self.max_abs_deviation = self.max_abs_deviation.max((s.speed - s.target).abs());
        if !s.in_band {
            self.settled_at = None;
        } else if self.settled_at.is_none() {
            self.settled_at = Some(s.time);
        }
    }

    fn finish(self) -> RunSummary {
        RunSummary {
            ticks: self.ticks,
            final_sample: self.final_sample,
            settled_at: self.settled_at,
            max_abs_deviation: self.max_abs_deviation,
            missed_deadlines: self.missed_deadlines,
            max_latency_us: self.max_latency_us,
        }
    }
}

/// Run the simulator until the tick budget is spent or `shutdown` is raised.
///
/// A bounded run cut short by `shutdown` returns `SimError::Interrupted`;
/// an unbounded run treats shutdown as its normal end.
#[allow(clippy::too_many_arguments)]
pub fn run<D, T, C, F>(
    sim: &mut Simulator,
    disturbance: &mut D,
    target: &mut T,
    clock: &C,
    params: RunParams,
    shutdown: Option<&AtomicBool>,
    mut on_sample: F,
) -> Result<RunSummary>
where
    D: DisturbanceSource + ?Sized,
    T: TargetSource + ?Sized,
    C: Clock + ?Sized,
    F: FnMut(&TelemetrySample),
{
    let stop_requested = || shutdown.is_some_and(|f| f.load(Ordering::Relaxed));
    let mut tracker = Tracker::default();

    tracing::info!(
        ticks = ?params.ticks,
        interval_ms = params.interval.as_millis() as u64,
        dt = sim.dt(),
        "run start"
    );

    loop {
        if params.ticks.is_some_and(|budget| tracker.ticks >= budget) {
            break;
        }
        if stop_requested() {
            if params.ticks.is_some() {
                tracing::warn!(ticks = tracker.ticks, "run interrupted");
                return Err(SimError::Interrupted {
                    ticks: tracker.ticks,
                }
                .into());
            }
            break;
        }

        let started = clock.now();
        let sample = sim.tick_from(disturbance, target);
        tracker.observe(&sample);
        on_sample(&sample);

        let elapsed = clock.now().saturating_duration_since(started);
        let latency_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        tracker.max_latency_us = tracker.max_latency_us.max(latency_us);

        if params.interval.is_zero() {
            continue;
        }
        if elapsed > params.interval {
            tracker.missed_deadlines += 1;
            tracing::warn!(
                tick = sample.tick,
                elapsed_us = latency_us,
                interval_ms = params.interval.as_millis() as u64,
                "tick overran its interval"
            );
        } else {
            clock.sleep(params.interval - elapsed);
        }
    }

    let summary = tracker.finish();
    tracing::info!(
        ticks = summary.ticks,
        settled_at = ?summary.settled_at,
        max_abs_deviation = summary.max_abs_deviation,
        missed_deadlines = summary.missed_deadlines,
        "run stop"
    );
    Ok(summary)
}
