use core::fmt::Display;

use fixed::types::I13F3;
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

/// Type alias for how the temperature value is actually stored.
pub type TemperatureValue = I13F3;

/// A temperature in degrees Celsius. Stores in 0.125 degC steps, matching
/// the resolution of the sensor's temperature register.
///
/// ```
/// use common::physical::Temperature;
/// let temp = Temperature::try_from(75f32).expect("Failed to get Temperature representation");
/// assert_eq!(temp.degrees_celsius(), 75f32);
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Temperature {
    value: TemperatureValue,
}

/// Represents errors in creating or using the `Temperature` type.
#[derive(Debug, Error)]
pub enum TemperatureError {
    /// The `Temperature` was trying to be created with a value outside the
    /// sensor's documented -55 to +125 degC operating range.
    #[error("Value outside of the sensor operating range!")]
    OutOfOperatingRange,
}

impl Temperature {
    /// Build a temperature from a raw count of 0.125 degC steps, as produced
    /// by the register codec. The full 11-bit two's complement step range is
    /// accepted, so this cannot fail.
    pub const fn from_raw_steps(steps: i16) -> Self {
        Self {
            value: TemperatureValue::from_bits(steps),
        }
    }

    /// Get the underlying fixed-point value.
    pub fn value(&self) -> TemperatureValue {
        self.value
    }

    /// The temperature in degrees Celsius.
    pub fn degrees_celsius(&self) -> f32 {
        self.value.to_num()
    }
}

impl TryFrom<f32> for Temperature {
    type Error = TemperatureError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        if value < -55f32 || value > 125f32 {
            return Err(TemperatureError::OutOfOperatingRange);
        }
        Ok(Self {
            value: TemperatureValue::from_num(value),
        })
    }
}

impl Display for Temperature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({} degC)", self.value)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_creation_with_eighth_degree_steps() {
        for i in -440..=1000 {
            let raw: f32 = (i as f32) / 8f32;
            let temp = Temperature::try_from(raw)
                .expect("Failed to get valid Temperature representation.");
            assert_eq!(temp.value, raw);
        }

        let temp = Temperature::try_from(-60f32);
        assert!(temp.is_err());

        let temp = Temperature::try_from(130f32);
        assert!(temp.is_err());
    }

    #[test]
    fn test_raw_steps_match_celsius() {
        assert_eq!(Temperature::from_raw_steps(600).degrees_celsius(), 75f32);
        assert_eq!(Temperature::from_raw_steps(-440).degrees_celsius(), -55f32);
        assert_eq!(Temperature::from_raw_steps(0).degrees_celsius(), 0f32);
    }
}
