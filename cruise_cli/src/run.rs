//! Simulator assembly from config and the `run` / `check-config` commands.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use cruise_config::Config;
use cruise_core::error::Result as CoreResult;
use cruise_core::runner::{self, RunParams, RunSummary};
use cruise_core::util::ticks_for_duration;
use cruise_core::{Schedule, ScheduleStep, Simulator, TelemetrySample};
use cruise_traits::MonotonicClock;
use eyre::WrapErr;
use serde_json::json;

use crate::cli::RunArgs;

/// Resolve the tick budget: --ticks, then --seconds, then simulation.ticks.
fn tick_budget(cfg: &Config, args: &RunArgs) -> Option<u64> {
    args.ticks
        .or_else(|| {
            args.seconds
                .map(|s| ticks_for_duration(s, cfg.simulation.dt))
        })
        .or(cfg.simulation.ticks)
}

fn pacing(cfg: &Config, args: &RunArgs) -> Duration {
    match args.interval_ms {
        Some(ms) => Duration::from_millis(ms),
        None if args.realtime => Duration::from_millis(cfg.simulation.interval_ms),
        None => Duration::ZERO,
    }
}

/// Inputs for the run: a scenario file, or a single step at tick 1 holding
/// the constant disturbance and optional target.
fn build_schedule(args: &RunArgs) -> CoreResult<Schedule> {
    if let Some(path) = &args.scenario {
        let rows = cruise_config::load_scenario_csv(path)?;
        return Schedule::from_rows(&rows);
    }
    if args.disturbance.is_none() && args.target.is_none() {
        return Ok(Schedule::default());
    }
    Schedule::new(vec![ScheduleStep {
        at_tick: 1,
        disturbance: args.disturbance.unwrap_or(0.0),
        target: args.target,
    }])
}

pub fn sample_json(s: &TelemetrySample) -> serde_json::Value {
    json!({
        "kind": "sample",
        "tick": s.tick,
        "time": s.time,
        "target": s.target,
        "speed": s.speed,
        "error_volts": s.error_volts,
        "command": s.command,
        "command_volts": s.command_volts,
        "p": s.p,
        "i": s.i,
        "d": s.d,
        "correction": s.correction,
        "disturbance": s.disturbance_raw,
        "actuator_real": s.actuator_real,
        "in_band": s.in_band,
    })
}

fn sample_line(s: &TelemetrySample) -> String {
    format!(
        "t={:.1}s target={:.0} speed={:.2} cmd={:+.2} ({:.3} V) dist={:.0} rpm={:.0}{}",
        s.time,
        s.target,
        s.speed,
        s.command,
        s.command_volts,
        s.disturbance_raw,
        s.actuator_real,
        if s.in_band { "" } else { " [out of band]" }
    )
}

fn print_sample(s: &TelemetrySample, json: bool) {
    if json {
        println!("{}", sample_json(s));
    } else {
        println!("{}", sample_line(s));
    }
}

fn print_summary(sim: &Simulator, summary: &RunSummary, json: bool) {
    let band = sim.tolerance_band();
    let last = summary.final_sample.unwrap_or_default();
    if json {
        println!(
            "{}",
            json!({
                "kind": "summary",
                "ticks": summary.ticks,
                "time": sim.time_elapsed(),
                "final_speed": last.speed,
                "target": sim.state().nominal_target,
                "band": [band.min, band.max],
                "in_band": sim.is_in_tolerance_band(),
                "settled_at": summary.settled_at,
                "max_abs_deviation": summary.max_abs_deviation,
                "missed_deadlines": summary.missed_deadlines,
                "max_latency_us": summary.max_latency_us,
            })
        );
        return;
    }
    println!(
        "Run complete: {} ticks ({:.1} s simulated)",
        summary.ticks,
        sim.time_elapsed()
    );
    println!(
        "Final speed: {:.2} km/h (target {:.0}, band [{:.0}-{:.0}], {})",
        last.speed,
        sim.state().nominal_target,
        band.min,
        band.max,
        if sim.is_in_tolerance_band() {
            "in band"
        } else {
            "out of band"
        }
    );
    match summary.settled_at {
        Some(t) => println!("Settled at: {t:.1} s"),
        None => println!("Settled at: never"),
    }
    println!("Max deviation: {:.2} km/h", summary.max_abs_deviation);
    if summary.missed_deadlines > 0 {
        println!("Missed deadlines: {}", summary.missed_deadlines);
    }
}

pub fn run_sim(
    cfg: &Config,
    args: &RunArgs,
    shutdown: Arc<AtomicBool>,
    json: bool,
) -> CoreResult<RunSummary> {
    let mut sim = Simulator::from_config(cfg)?;
    let schedule = build_schedule(args)?;

    let params = RunParams {
        ticks: tick_budget(cfg, args),
        interval: pacing(cfg, args),
    };
    if params.ticks.is_none() && params.interval.is_zero() {
        eyre::bail!(
            "a tick budget is required without --realtime (use --ticks, --seconds or simulation.ticks)"
        );
    }
    if params.ticks == Some(0) {
        eyre::bail!("tick budget must be >= 1");
    }

    let every = args.print_every;
    let summary = runner::run(
        &mut sim,
        &mut &schedule,
        &mut &schedule,
        &MonotonicClock::new(),
        params,
        Some(shutdown.as_ref()),
        |s| {
            if every.is_some_and(|n| s.tick % n == 0) {
                print_sample(s, json);
            }
        },
    )?;

    if args.history {
        for s in sim.history() {
            let mut v = sample_json(s);
            v["kind"] = json!("history");
            println!("{v}");
        }
    }
    print_summary(&sim, &summary, json);
    Ok(summary)
}

pub fn check_config(
    cfg: &Config,
    scenario: Option<&std::path::Path>,
    json: bool,
) -> CoreResult<()> {
    let sim = Simulator::from_config(cfg).wrap_err("build simulator from config")?;
    let schedule = match scenario {
        Some(path) => {
            let rows = cruise_config::load_scenario_csv(path)?;
            Some(Schedule::from_rows(&rows)?)
        }
        None => None,
    };
    let steps = schedule.as_ref().map(|s| s.steps().len());
    let last_tick = schedule.as_ref().and_then(Schedule::last_tick);
    let band = sim.tolerance_band();
    if json {
        println!(
            "{}",
            json!({
                "kind": "config",
                "ok": true,
                "dt": sim.dt(),
                "band": [band.min, band.max],
                "scenario_steps": steps,
                "scenario_last_tick": last_tick,
            })
        );
    } else {
        println!(
            "Config OK: dt={} s, initial band [{:.0}-{:.0}]",
            sim.dt(),
            band.min,
            band.max
        );
        if let (Some(n), Some(last)) = (steps, last_tick) {
            println!("Scenario OK: {n} steps, last change at tick {last}");
        }
    }
    Ok(())
}
