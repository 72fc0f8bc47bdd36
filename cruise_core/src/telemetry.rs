//! Per-tick telemetry and the bounded history that external consumers read.
//!
//! The history is a ring buffer: once `capacity` samples are held, every
//! push evicts the oldest. Nothing in the control path reads it back.

use std::collections::VecDeque;

/// Snapshot of every signal computed during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TelemetrySample {
    /// 1-based tick index.
    pub tick: u64,
    /// Simulated seconds at the end of the tick.
    pub time: f64,
    pub target: f64,
    pub speed: f64,
    /// Feedback signal; equals `speed` (no sensor noise model).
    pub feedback: f64,
    /// Target minus start-of-tick speed, km/h.
    pub error_speed: f64,
    /// Target minus start-of-tick speed, sensor volts. Input to the controller.
    pub error_volts: f64,
    pub target_volts: f64,
    pub speed_volts: f64,
    /// Saturated controller output.
    pub command: f64,
    /// Controller output mapped onto the output voltage range.
    pub command_volts: f64,
    pub p: f64,
    pub i: f64,
    pub d: f64,
    pub correction: f64,
    pub disturbance_raw: f64,
    pub disturbance_shaped: f64,
    pub actuator_command: f64,
    pub actuator_real: f64,
    /// Post-tick speed inside the post-tick tolerance band.
    pub in_band: bool,
}

/// Fixed-capacity, insertion-ordered sample buffer.
#[derive(Debug, Clone)]
pub struct TelemetryHistory {
    buf: VecDeque<TelemetrySample>,
    capacity: usize,
}

impl TelemetryHistory {
    /// `capacity` is raised to at least 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buf: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: TelemetrySample) {
        if self.buf.len() == self.capacity {
            self.buf.pop_front();
        }
        self.buf.push_back(sample);
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &TelemetrySample> + ExactSizeIterator {
        self.buf.iter()
    }

    pub fn latest(&self) -> Option<&TelemetrySample> {
        self.buf.back()
    }

    pub fn oldest(&self) -> Option<&TelemetrySample> {
        self.buf.front()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Owned copy, oldest to newest.
    pub fn to_vec(&self) -> Vec<TelemetrySample> {
        self.buf.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

impl<'a> IntoIterator for &'a TelemetryHistory {
    type Item = &'a TelemetrySample;
    type IntoIter = std::collections::vec_deque::Iter<'a, TelemetrySample>;

    fn into_iter(self) -> Self::IntoIter {
        self.buf.iter()
    }
}
