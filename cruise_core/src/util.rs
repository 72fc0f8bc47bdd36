//! Time helpers for sizing runs.

/// Number of ticks of length `dt` needed to cover `seconds` of simulated time.
/// Rounds up; non-positive or non-finite input yields 0.
#[inline]
pub fn ticks_for_duration(seconds: f64, dt: f64) -> u64 {
    if !(seconds.is_finite() && dt.is_finite()) || seconds <= 0.0 || dt <= 0.0 {
        return 0;
    }
    // Guard against 10.0 / 0.1 = 100.00000000000001
    let n = (seconds / dt - 1e-9).ceil();
    if n >= u64::MAX as f64 { u64::MAX } else { n as u64 }
}
