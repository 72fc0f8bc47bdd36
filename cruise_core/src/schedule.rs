//! Scripted inputs: a piecewise-constant disturbance and target profile.
//!
//! Each step takes effect at `at_tick` (1-based) and holds until the next.
//! Before the first step the disturbance is zero and the target is left
//! alone. A step with `target: None` keeps whatever setpoint is current.

use cruise_traits::{DisturbanceSource, TargetSource};

use crate::error::{Result, SimError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleStep {
    pub at_tick: u64,
    pub disturbance: f64,
    pub target: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    steps: Vec<ScheduleStep>,
}

impl Schedule {
    /// Steps are sorted by tick; duplicate ticks and non-finite values are rejected.
    pub fn new(mut steps: Vec<ScheduleStep>) -> Result<Self> {
        steps.sort_by_key(|s| s.at_tick);
        for pair in steps.windows(2) {
            if pair[0].at_tick == pair[1].at_tick {
                return Err(SimError::Config(format!(
                    "schedule has two steps at tick {}",
                    pair[0].at_tick
                ))
                .into());
            }
        }
        for s in &steps {
            if s.at_tick == 0 {
                return Err(SimError::Config("schedule ticks are 1-based".into()).into());
            }
            if !s.disturbance.is_finite() || s.target.is_some_and(|t| !t.is_finite()) {
                return Err(SimError::Config(format!(
                    "schedule step at tick {} has a non-finite value",
                    s.at_tick
                ))
                .into());
            }
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[ScheduleStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Tick of the last step, if any.
    pub fn last_tick(&self) -> Option<u64> {
        self.steps.last().map(|s| s.at_tick)
    }

    /// The step in force at `tick`.
    pub fn active(&self, tick: u64) -> Option<&ScheduleStep> {
        let idx = self.steps.partition_point(|s| s.at_tick <= tick);
        idx.checked_sub(1).map(|i| &self.steps[i])
    }

    /// Step that begins exactly at `tick`.
    fn starting_at(&self, tick: u64) -> Option<&ScheduleStep> {
        self.steps
            .binary_search_by_key(&tick, |s| s.at_tick)
            .ok()
            .map(|i| &self.steps[i])
    }
}

impl DisturbanceSource for &Schedule {
    fn disturbance(&mut self, tick: u64) -> f64 {
        self.active(tick).map_or(0.0, |s| s.disturbance)
    }
}

impl TargetSource for &Schedule {
    /// Target changes are edge-triggered: reported only on the step's own tick.
    fn target(&mut self, tick: u64) -> Option<f64> {
        self.starting_at(tick).and_then(|s| s.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(at_tick: u64, disturbance: f64, target: Option<f64>) -> ScheduleStep {
        ScheduleStep {
            at_tick,
            disturbance,
            target,
        }
    }

    #[test]
    fn piecewise_constant_disturbance() {
        let s = Schedule::new(vec![step(10, 50.0, None), step(3, 20.0, Some(70.0))]).unwrap();
        let mut src = &s;
        assert_eq!(src.disturbance(1), 0.0);
        assert_eq!(src.disturbance(3), 20.0);
        assert_eq!(src.disturbance(9), 20.0);
        assert_eq!(src.disturbance(10), 50.0);
        assert_eq!(src.disturbance(10_000), 50.0);
        assert_eq!(s.last_tick(), Some(10));
        assert_eq!(Schedule::default().last_tick(), None);
    }

    #[test]
    fn target_reported_on_its_tick_only() {
        let s = Schedule::new(vec![step(3, 0.0, Some(70.0)), step(5, 0.0, None)]).unwrap();
        let mut src = &s;
        assert_eq!(src.target(2), None);
        assert_eq!(src.target(3), Some(70.0));
        assert_eq!(src.target(4), None);
        assert_eq!(src.target(5), None);
    }

    #[test]
    fn rejects_duplicates_and_zero_tick() {
        assert!(Schedule::new(vec![step(2, 0.0, None), step(2, 1.0, None)]).is_err());
        let err = Schedule::new(vec![step(0, 0.0, None)]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SimError>(),
            Some(SimError::Config(_))
        ));
    }

    #[test]
    fn rejects_non_finite() {
        assert!(Schedule::new(vec![step(1, f64::NAN, None)]).is_err());
        assert!(Schedule::new(vec![step(1, 0.0, Some(f64::INFINITY))]).is_err());
    }
}
