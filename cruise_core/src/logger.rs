//! Periodic tick log sink.
//!
//! Every `log_every`-th tick the orchestrator hands the fresh sample to a
//! `TickLogger`. The sink is an external side effect and never feeds back
//! into the control law.

use crate::status::ToleranceBand;
use crate::telemetry::TelemetrySample;

/// Corrections larger than this are flagged in the log line.
pub const CORRECTION_FLAG_THRESHOLD: f64 = 2.0;

pub trait TickLogger {
    fn log(&self, sample: &TelemetrySample, band: ToleranceBand);
}

/// Emits one structured `tracing` event per logged tick.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl TickLogger for TracingLogger {
    fn log(&self, s: &TelemetrySample, band: ToleranceBand) {
        tracing::info!(
            t = format_args!("{:.1}", s.time),
            target = format_args!("{:.0}", s.target),
            speed = format_args!("{:.1}", s.speed),
            error_v = format_args!("{:.3}", s.error_volts),
            command_v = format_args!("{:.3}", s.command_volts),
            disturbance = format_args!("{:.0}", s.disturbance_raw),
            band = format_args!("[{:.0}-{:.0}]", band.min, band.max),
            in_band = s.in_band,
            correcting = s.correction.abs() > CORRECTION_FLAG_THRESHOLD,
            "tick"
        );
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl TickLogger for NullLogger {
    fn log(&self, _sample: &TelemetrySample, _band: ToleranceBand) {}
}
