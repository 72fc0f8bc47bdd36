//! Unit conversion between the physical domain (speed, km/h) and the sensor
//! domain (voltage).
//!
//! The controller receives its error in volts, as a real speed sensor would
//! report it, and converts it back to km/h before applying the control law.
//! Skipping that round trip changes the closed-loop gain whenever the sensor
//! range saturates, so the orchestrator always goes through these helpers.

/// Affine sensor model and command output scaling.
///
/// speed ∈ [speed_min, speed_max] ↔ volts ∈ [volt_min, volt_max]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionParameters {
    /// Speed mapped to `volt_min` (km/h).
    pub speed_min: f64,
    /// Speed mapped to `volt_max` (km/h).
    pub speed_max: f64,
    pub volt_min: f64,
    pub volt_max: f64,
    /// Command voltage meaning "no actuation requested".
    pub neutral_volts: f64,
    /// Magnitude of the internal command mapped onto the full half-range
    /// around `neutral_volts`.
    pub command_range: f64,
}

impl Default for ConversionParameters {
    fn default() -> Self {
        Self {
            speed_min: 50.0,
            speed_max: 100.0,
            volt_min: 0.0,
            volt_max: 5.0,
            neutral_volts: 2.5,
            command_range: 25.0,
        }
    }
}

impl ConversionParameters {
    #[inline]
    fn speed_span(&self) -> f64 {
        self.speed_max - self.speed_min
    }

    #[inline]
    fn volt_span(&self) -> f64 {
        self.volt_max - self.volt_min
    }

    /// Speed (km/h) to sensor voltage, clamped to the voltage range.
    /// A zero-width speed range maps everything to 0 V.
    pub fn speed_to_voltage(&self, speed: f64) -> f64 {
        let span = self.speed_span();
        if span == 0.0 {
            return 0.0;
        }
        let v = (speed - self.speed_min) / span * self.volt_span() + self.volt_min;
        v.clamp(self.volt_min, self.volt_max)
    }

    /// Sensor voltage back to speed. Not clamped; diagnostic use only.
    pub fn voltage_to_speed(&self, volts: f64) -> f64 {
        let span = self.volt_span();
        if span == 0.0 {
            return self.speed_min;
        }
        (volts - self.volt_min) / span * self.speed_span() + self.speed_min
    }

    /// Re-scale a voltage difference into a speed difference.
    pub fn error_to_speed(&self, error_volts: f64) -> f64 {
        let span = self.volt_span();
        if span == 0.0 {
            return 0.0;
        }
        error_volts * (self.speed_span() / span)
    }

    /// Map an internal command onto the output voltage range, centred on
    /// `neutral_volts`. Commands beyond `±command_range` saturate.
    pub fn command_to_voltage(&self, command: f64) -> f64 {
        let range = self.command_range.abs();
        let scaled = if range == 0.0 {
            0.0
        } else {
            command.clamp(-range, range) * (self.neutral_volts / range)
        };
        (scaled + self.neutral_volts).clamp(self.volt_min, self.volt_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn reference_sensor_mapping() {
        let c = ConversionParameters::default();
        assert!(approx(c.speed_to_voltage(50.0), 0.0));
        assert!(approx(c.speed_to_voltage(80.0), 3.0));
        assert!(approx(c.speed_to_voltage(100.0), 5.0));
    }

    #[test]
    fn speed_to_voltage_clamps_outside_sensor_range() {
        let c = ConversionParameters::default();
        assert_eq!(c.speed_to_voltage(20.0), 0.0);
        assert_eq!(c.speed_to_voltage(140.0), 5.0);
    }

    #[test]
    fn voltage_to_speed_is_unclamped() {
        let c = ConversionParameters::default();
        assert!(approx(c.voltage_to_speed(6.0), 110.0));
        assert!(approx(c.voltage_to_speed(-1.0), 40.0));
    }

    #[test]
    fn degenerate_ranges_do_not_divide_by_zero() {
        let c = ConversionParameters {
            speed_min: 60.0,
            speed_max: 60.0,
            volt_min: 1.0,
            volt_max: 1.0,
            ..ConversionParameters::default()
        };
        assert_eq!(c.speed_to_voltage(75.0), 0.0);
        assert_eq!(c.voltage_to_speed(3.0), 60.0);
        assert_eq!(c.error_to_speed(0.5), 0.0);
    }

    #[test]
    fn error_scales_by_span_ratio() {
        let c = ConversionParameters::default();
        // 50 km/h over 5 V
        assert!(approx(c.error_to_speed(0.2), 2.0));
        assert!(approx(c.error_to_speed(-0.05), -0.5));
    }

    #[test]
    fn command_voltage_is_centred_and_saturates() {
        let c = ConversionParameters::default();
        assert!(approx(c.command_to_voltage(0.0), 2.5));
        assert!(approx(c.command_to_voltage(10.0), 3.5));
        assert!(approx(c.command_to_voltage(-25.0), 0.0));
        assert!(approx(c.command_to_voltage(-30.0), 0.0));
        assert!(approx(c.command_to_voltage(80.0), 5.0));
    }
}
