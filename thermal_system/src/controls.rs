use common::physical::Temperature;

use crate::models::notification::ThermalNotification;

/// Software side over-temperature threshold: 80 degC in 0.125 degC steps.
/// Checked independently of the threshold programmed into the sensor's
/// own comparator.
pub const OVER_TEMPERATURE_THRESHOLD: Temperature = Temperature::from_raw_steps(640);

/// Classify a confirmed alert reading against the software threshold.
/// Readings strictly above it are over temperature; the threshold itself
/// still counts as safe.
pub fn classify_alert_reading(temperature: Temperature) -> ThermalNotification {
    if temperature > OVER_TEMPERATURE_THRESHOLD {
        ThermalNotification::OverTemperature
    } else {
        ThermalNotification::SafeOperating
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_reading_above_threshold_is_over_temperature() {
        let temp = Temperature::try_from(85f32).unwrap();
        assert_eq!(
            classify_alert_reading(temp),
            ThermalNotification::OverTemperature
        );
    }

    #[test]
    fn test_reading_below_threshold_is_safe() {
        let temp = Temperature::try_from(70f32).unwrap();
        assert_eq!(
            classify_alert_reading(temp),
            ThermalNotification::SafeOperating
        );
    }

    #[test]
    fn test_threshold_itself_is_safe() {
        assert_eq!(
            classify_alert_reading(OVER_TEMPERATURE_THRESHOLD),
            ThermalNotification::SafeOperating
        );
    }
}
