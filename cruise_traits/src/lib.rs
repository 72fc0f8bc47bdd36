//! Seams between the simulation kernel and its collaborators.
//!
//! The kernel consumes a periodic tick source (`Clock`) and two live scalar
//! providers, one for the disturbance magnitude and one for the target speed.
//! Both providers are read exactly once at the start of every tick.
pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

/// Supplies the raw (pre-attenuation) disturbance for a tick, in actuator units.
pub trait DisturbanceSource {
    fn disturbance(&mut self, tick: u64) -> f64;
}

/// Supplies an optional new speed setpoint for a tick.
///
/// `None` keeps the current target.
pub trait TargetSource {
    fn target(&mut self, tick: u64) -> Option<f64>;
}

impl<S: DisturbanceSource + ?Sized> DisturbanceSource for Box<S> {
    fn disturbance(&mut self, tick: u64) -> f64 {
        (**self).disturbance(tick)
    }
}

impl<S: TargetSource + ?Sized> TargetSource for Box<S> {
    fn target(&mut self, tick: u64) -> Option<f64> {
        (**self).target(tick)
    }
}
