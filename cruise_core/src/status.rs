//! Tolerance band and the operating zone derived from it.

/// Where the speed sits relative to the tolerance band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandZone {
    /// Below `band.min`.
    Below,
    /// Inside `[band.min, band.max]`, inclusive.
    InBand,
    /// Above `band.max`.
    Above,
}

/// Asymmetric speed interval around the current target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceBand {
    pub min: f64,
    pub max: f64,
}

impl ToleranceBand {
    /// Band for `target` with offsets relative to it (`offset_min` is
    /// usually negative).
    #[inline]
    pub fn around(target: f64, offset_min: f64, offset_max: f64) -> Self {
        Self {
            min: target + offset_min,
            max: target + offset_max,
        }
    }

    #[inline]
    pub fn contains(&self, speed: f64) -> bool {
        self.min <= speed && speed <= self.max
    }

    pub fn zone(&self, speed: f64) -> BandZone {
        if speed > self.max {
            BandZone::Above
        } else if speed < self.min {
            BandZone::Below
        } else {
            BandZone::InBand
        }
    }
}
