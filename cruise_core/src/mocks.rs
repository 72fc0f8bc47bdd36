//! Test and helper sources for cruise_core

use cruise_traits::{DisturbanceSource, TargetSource};

/// Same disturbance every tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantDisturbance(pub f64);

impl DisturbanceSource for ConstantDisturbance {
    fn disturbance(&mut self, _tick: u64) -> f64 {
        self.0
    }
}

/// Same target request every tick; `ConstantTarget(None)` never changes the setpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantTarget(pub Option<f64>);

impl TargetSource for ConstantTarget {
    fn target(&mut self, _tick: u64) -> Option<f64> {
        self.0
    }
}
