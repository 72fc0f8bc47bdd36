//! Cross-thread live scalar input.
//!
//! A front end (slider, stdin reader, ...) writes with `set`; the tick loop
//! reads at tick boundaries. The value is stored as `f64` bits in an
//! `AtomicU64`, so neither side ever blocks.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use cruise_traits::{DisturbanceSource, TargetSource};

#[derive(Debug, Clone)]
pub struct LiveInput {
    bits: Arc<AtomicU64>,
}

impl LiveInput {
    pub fn new(initial: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(initial.to_bits())),
        }
    }

    pub fn set(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Release);
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }
}

impl Default for LiveInput {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl DisturbanceSource for LiveInput {
    fn disturbance(&mut self, _tick: u64) -> f64 {
        self.get()
    }
}

impl TargetSource for LiveInput {
    fn target(&mut self, _tick: u64) -> Option<f64> {
        Some(self.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_value() {
        let writer = LiveInput::new(80.0);
        let mut reader = writer.clone();
        writer.set(60.0);
        assert_eq!(reader.target(1), Some(60.0));
        assert_eq!(reader.disturbance(1), 60.0);
    }

    #[test]
    fn visible_across_threads() {
        let input = LiveInput::default();
        let w = input.clone();
        std::thread::spawn(move || w.set(150.0))
            .join()
            .unwrap();
        assert_eq!(input.get(), 150.0);
    }
}
