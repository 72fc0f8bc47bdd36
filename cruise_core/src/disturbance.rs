//! Disturbance shaping: the external load reaches the powertrain only
//! partially, and only within a physically plausible range.

/// Clamp range and attenuation for raw disturbances (actuator units, RPM).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisturbanceParameters {
    pub min: f64,
    pub max: f64,
    /// Fraction of the clamped disturbance that reaches the actuator.
    pub attenuation: f64,
}

impl Default for DisturbanceParameters {
    fn default() -> Self {
        Self {
            min: -100.0,
            max: 200.0,
            attenuation: 0.3,
        }
    }
}

impl DisturbanceParameters {
    /// Clamp to `[min, max]` without attenuating. Non-finite input maps to 0.
    /// Idempotent.
    #[inline]
    pub fn clamp(&self, raw: f64) -> f64 {
        if !raw.is_finite() {
            return 0.0;
        }
        raw.clamp(self.min, self.max)
    }

    /// Clamp then attenuate.
    #[inline]
    pub fn shape(&self, raw: f64) -> f64 {
        self.clamp(raw) * self.attenuation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_within_range() {
        let d = DisturbanceParameters::default();
        assert!((d.shape(100.0) - 30.0).abs() < 1e-12);
        assert!((d.shape(-50.0) + 15.0).abs() < 1e-12);
        assert_eq!(d.shape(0.0), 0.0);
    }

    #[test]
    fn clamps_before_attenuating() {
        let d = DisturbanceParameters::default();
        assert!((d.shape(300.0) - 60.0).abs() < 1e-12);
        assert!((d.shape(-300.0) + 30.0).abs() < 1e-12);
    }

    #[test]
    fn non_finite_input_is_no_disturbance() {
        let d = DisturbanceParameters::default();
        assert_eq!(d.shape(f64::NAN), 0.0);
        assert_eq!(d.shape(f64::INFINITY), 0.0);
    }

    #[test]
    fn clamp_maps_non_finite_to_zero() {
        let d = DisturbanceParameters::default();
        assert_eq!(d.clamp(f64::NAN), 0.0);
        assert_eq!(d.clamp(f64::NEG_INFINITY), 0.0);
        assert_eq!(d.clamp(500.0), 200.0);
        assert_eq!(d.clamp(-500.0), -100.0);
    }
}
