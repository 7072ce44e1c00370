//! Scaling between raw register counts and engineering units.
//!
//! Each scaled register has a fixed resolution (the physical increment of one count) and a
//! documented valid range. Values handed to the board are checked against that range before
//! anything is written.

use crate::error::OutOfRange;

/// VSET, VMON and SVMAX: [0 : 4000] V in 0.1 V steps.
pub const VOLTAGE: Scale = Scale::new(0.1, 0.0, 4000.0);
/// ISET and IMONH: [0 : 3100] uA in 0.05 uA steps.
pub const CURRENT_HIGH: Scale = Scale::new(0.05, 0.0, 3100.0);
/// IMONL: [0 : 300] uA in 0.005 uA steps.
pub const CURRENT_LOW: Scale = Scale::new(0.005, 0.0, 300.0);
/// TRIP_TIME: [0 : 1000] s in 0.1 s steps.
pub const TRIP_TIME: Scale = Scale::new(0.1, 0.0, 1000.0);
/// RAMP_UP and RAMP_DOWN: [0 : 500] V/s.
pub const RAMP_RATE: Scale = Scale::new(1.0, 0.0, 500.0);
/// TEMPERATURE: [-40 : 125] degC, two's complement.
pub const TEMPERATURE: Scale = Scale::new(1.0, -40.0, 125.0);
/// VMAX: [0 : 4100] V.
pub const MAX_VOLTAGE: Scale = Scale::new(1.0, 0.0, 4100.0);
/// IMAX: [0 : 3100] uA.
pub const MAX_CURRENT: Scale = Scale::new(1.0, 0.0, 3100.0);

/// Resolution and valid range of a scaled register.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    /// Engineering units per raw count. E.g. `0.1` means raw `123` is `12.3`.
    pub resolution: f32,
    /// Smallest accepted value, in engineering units.
    pub min: f32,
    /// Largest accepted value, in engineering units.
    pub max: f32,
}

impl Scale {
    pub const fn new(resolution: f32, min: f32, max: f32) -> Self {
        Self {
            resolution,
            min,
            max,
        }
    }

    /// Convert an unsigned raw register value to engineering units.
    #[inline]
    pub fn to_units(&self, raw: u16) -> f32 {
        raw as f32 * self.resolution
    }

    /// Convert a value in engineering units to raw counts, rounding to the closest count.
    pub fn to_raw(&self, value: f32) -> Result<u16, OutOfRange> {
        // NaN is never contained, so it is rejected along with the infinities.
        if !(self.min..=self.max).contains(&value) {
            return Err(self.out_of_range(value));
        }
        let counts = libm::roundf(value / self.resolution);
        if (0.0..=u16::MAX as f32).contains(&counts) {
            Ok(counts as u16)
        } else {
            Err(self.out_of_range(value))
        }
    }

    fn out_of_range(&self, value: f32) -> OutOfRange {
        OutOfRange {
            value,
            min: self.min,
            max: self.max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voltage_scaling() {
        // Raw value 12345 decivolts = 1234.5 V
        assert!((VOLTAGE.to_units(12345) - 1234.5).abs() < 1e-3);
        assert_eq!(VOLTAGE.to_raw(1234.5), Ok(12345));
        assert_eq!(VOLTAGE.to_raw(4000.0), Ok(40000));
    }

    #[test]
    fn test_rounding_instead_of_truncation() {
        // 0.3 / 0.1 is slightly below 3 in floating point.
        assert_eq!(VOLTAGE.to_raw(0.3), Ok(3));
        assert_eq!(CURRENT_LOW.to_raw(0.015), Ok(3));
        assert_eq!(VOLTAGE.to_raw(0.04), Ok(0));
        assert_eq!(VOLTAGE.to_raw(0.06), Ok(1));
    }

    #[test]
    fn test_rounding_just_below_half_a_count() {
        // Adding 0.5 before truncating would round this up in f32.
        assert_eq!(VOLTAGE.to_raw(0.049_999_997), Ok(0));
        assert_eq!(CURRENT_HIGH.to_raw(3100.0), Ok(62000));
    }

    #[test]
    fn test_out_of_range() {
        let err = VOLTAGE.to_raw(4000.1).unwrap_err();
        assert_eq!(err.max, 4000.0);
        assert!(VOLTAGE.to_raw(-0.1).is_err());
        assert!(VOLTAGE.to_raw(f32::NAN).is_err());
        assert!(VOLTAGE.to_raw(f32::INFINITY).is_err());
    }

    #[test]
    fn test_negative_counts_refused() {
        assert!(TEMPERATURE.to_raw(-40.0).is_err());
        assert_eq!(TEMPERATURE.to_raw(25.0), Ok(25));
    }
}
