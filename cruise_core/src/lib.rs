#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Closed-loop vehicle speed control simulation kernel.
//!
//! The kernel advances a single-vehicle cruise control loop in fixed time
//! steps. Everything outside the loop (pacing, live inputs, rendering of
//! telemetry) goes through `cruise_traits`.
//!
//! ## Architecture
//!
//! - **Units**: affine speed ↔ voltage sensor model (`units` module)
//! - **Control**: gain-scheduled PID with anti-windup and predictive
//!   overshoot suppression (`controller` module)
//! - **Plant**: first-order actuator with disturbance and speed envelope
//!   (`plant`, `disturbance` modules)
//! - **Orchestration**: `Simulator::tick` runs one full update and appends a
//!   `TelemetrySample` to a bounded history
//! - **Runner**: paced loop over a `Clock` with a shutdown flag (`runner`)
//!
//! ## Tick order
//!
//! 1. Apply a pending target override.
//! 2. Measure the error in volts, convert to km/h.
//! 3. Compute the command, map it to the output voltage.
//! 4. Shape the disturbance, step the plant.
//! 5. Record telemetry; every `log_every` ticks, emit a log line.

pub mod builder;
pub mod config;
pub mod controller;
#[cfg(feature = "config")]
pub mod conversions;
pub mod core;
pub mod disturbance;
pub mod error;
pub mod live;
pub mod logger;
pub mod mocks;
pub mod plant;
pub mod runner;
pub mod schedule;
pub mod state;
pub mod status;
pub mod telemetry;
pub mod units;
pub mod util;

pub use builder::SimulatorBuilder;
pub use config::{ControllerParameters, InitialConditions, PlantParameters, SimulationCfg};
pub use self::core::Simulator;
pub use disturbance::DisturbanceParameters;
pub use error::{BuildError, Result, SimError};
pub use live::LiveInput;
pub use logger::{NullLogger, TickLogger, TracingLogger};
pub use runner::{RunParams, RunSummary};
pub use schedule::{Schedule, ScheduleStep};
pub use state::SimulationState;
pub use status::{BandZone, ToleranceBand};
pub use telemetry::{TelemetryHistory, TelemetrySample};
pub use units::ConversionParameters;
