use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use cruise_core::mocks::{ConstantDisturbance, ConstantTarget};
use cruise_core::runner::{self, RunParams};
use cruise_core::{
    LiveInput, NullLogger, Schedule, ScheduleStep, SimError, Simulator, TelemetrySample,
    TickLogger, ToleranceBand,
};
use cruise_traits::{Clock, ManualClock};
use rstest::rstest;

/// Records the tick index of every logged sample.
#[derive(Clone, Default)]
struct SpyLogger(Arc<Mutex<Vec<u64>>>);

impl TickLogger for SpyLogger {
    fn log(&self, sample: &TelemetrySample, _band: ToleranceBand) {
        self.0.lock().unwrap().push(sample.tick);
    }
}

/// Every `now()` call costs 150 ms, so each tick overruns a 100 ms interval.
struct SlowClock(ManualClock);

impl Clock for SlowClock {
    fn now(&self) -> Instant {
        self.0.advance(Duration::from_millis(150));
        self.0.now()
    }
    fn sleep(&self, d: Duration) {
        self.0.sleep(d);
    }
}

fn quiet_sim() -> Simulator {
    Simulator::builder()
        .with_logger(NullLogger)
        .try_build()
        .unwrap()
}

#[rstest]
fn paced_run_respects_budget_and_interval() {
    let mut sim = quiet_sim();
    let clock = ManualClock::new();
    let params = RunParams {
        ticks: Some(50),
        interval: Duration::from_millis(100),
    };
    let mut seen = 0u64;
    let summary = runner::run(
        &mut sim,
        &mut ConstantDisturbance(0.0),
        &mut ConstantTarget(None),
        &clock,
        params,
        None,
        |_| seen += 1,
    )
    .expect("bounded run completes");

    assert_eq!(summary.ticks, 50);
    assert_eq!(seen, 50);
    assert_eq!(sim.ticks(), 50);
    assert_eq!(clock.elapsed(), Duration::from_millis(5_000));
    assert_eq!(summary.missed_deadlines, 0);
    assert_eq!(summary.final_sample.map(|s| s.tick), Some(50));
}

#[rstest]
fn settles_and_reports_deviation() {
    let mut sim = quiet_sim();
    let summary = runner::run(
        &mut sim,
        &mut ConstantDisturbance(0.0),
        &mut ConstantTarget(None),
        &ManualClock::new(),
        RunParams {
            ticks: Some(150),
            interval: Duration::ZERO,
        },
        None,
        |_| {},
    )
    .unwrap();

    let settled = summary.settled_at.expect("run ends in band");
    assert!(settled > 0.0 && settled < 10.0, "settled at {settled}");
    assert!(summary.max_abs_deviation > 9.0 && summary.max_abs_deviation <= 10.0);
}

#[rstest]
fn overruns_are_counted() {
    let mut sim = quiet_sim();
    let summary = runner::run(
        &mut sim,
        &mut ConstantDisturbance(0.0),
        &mut ConstantTarget(None),
        &SlowClock(ManualClock::new()),
        RunParams {
            ticks: Some(5),
            interval: Duration::from_millis(100),
        },
        None,
        |_| {},
    )
    .unwrap();
    assert_eq!(summary.missed_deadlines, 5);
    assert_eq!(summary.max_latency_us, 150_000);
}

#[rstest]
fn bounded_run_interrupted_by_shutdown() {
    let mut sim = quiet_sim();
    let stop = AtomicBool::new(false);
    let err = runner::run(
        &mut sim,
        &mut ConstantDisturbance(0.0),
        &mut ConstantTarget(None),
        &ManualClock::new(),
        RunParams {
            ticks: Some(100),
            interval: Duration::ZERO,
        },
        Some(&stop),
        |s| {
            if s.tick == 10 {
                stop.store(true, Ordering::Relaxed);
            }
        },
    )
    .expect_err("shutdown before budget");

    match err.downcast_ref::<SimError>() {
        Some(SimError::Interrupted { ticks }) => assert_eq!(*ticks, 10),
        other => panic!("expected Interrupted, got {other:?}"),
    }
    assert_eq!(sim.ticks(), 10);
}

#[rstest]
fn unbounded_run_stops_cleanly_on_shutdown() {
    let mut sim = quiet_sim();
    let stop = AtomicBool::new(false);
    let summary = runner::run(
        &mut sim,
        &mut ConstantDisturbance(0.0),
        &mut ConstantTarget(None),
        &ManualClock::new(),
        RunParams {
            ticks: None,
            interval: Duration::from_millis(100),
        },
        Some(&stop),
        |s| {
            if s.tick == 42 {
                stop.store(true, Ordering::Relaxed);
            }
        },
    )
    .expect("unbounded run ends normally");
    assert_eq!(summary.ticks, 42);
}

#[rstest]
#[case(5, 50, 10)]
#[case(1, 7, 7)]
#[case(10, 9, 0)]
fn logger_fires_every_nth_tick(#[case] every: u64, #[case] ticks: u64, #[case] expected: usize) {
    let spy = SpyLogger::default();
    let mut sim = Simulator::builder()
        .with_simulation(cruise_core::SimulationCfg {
            log_every: every,
            ..cruise_core::SimulationCfg::default()
        })
        .with_logger(spy.clone())
        .try_build()
        .unwrap();
    for _ in 0..ticks {
        sim.tick(0.0, None);
    }
    let logged = spy.0.lock().unwrap().clone();
    assert_eq!(logged.len(), expected);
    assert!(logged.iter().all(|t| t % every == 0));
}

#[rstest]
fn schedule_drives_inputs() {
    let schedule = Schedule::new(vec![
        ScheduleStep {
            at_tick: 20,
            disturbance: 100.0,
            target: None,
        },
        ScheduleStep {
            at_tick: 40,
            disturbance: 0.0,
            target: Some(65.0),
        },
    ])
    .unwrap();
    let mut sim = quiet_sim();
    let mut samples = Vec::new();
    runner::run(
        &mut sim,
        &mut &schedule,
        &mut &schedule,
        &ManualClock::new(),
        RunParams {
            ticks: Some(60),
            interval: Duration::ZERO,
        },
        None,
        |s| samples.push(*s),
    )
    .unwrap();

    assert_eq!(samples[18].disturbance_raw, 0.0);
    assert_eq!(samples[19].disturbance_raw, 100.0);
    assert_eq!(samples[38].target, 80.0);
    assert_eq!(samples[39].target, 65.0);
    assert_eq!(samples[59].target, 65.0);
}

#[rstest]
fn live_input_changes_target_between_ticks() {
    let target = LiveInput::new(80.0);
    let writer = target.clone();
    let mut sim = quiet_sim();
    let mut reader = target;
    runner::run(
        &mut sim,
        &mut ConstantDisturbance(0.0),
        &mut reader,
        &ManualClock::new(),
        RunParams {
            ticks: Some(30),
            interval: Duration::ZERO,
        },
        None,
        |s| {
            if s.tick == 10 {
                writer.set(90.0);
            }
        },
    )
    .unwrap();
    let h = sim.history().to_vec();
    assert_eq!(h[9].target, 80.0);
    assert_eq!(h[10].target, 90.0);
}
