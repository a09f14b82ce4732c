//! Register layout of the LM75BD digital temperature sensor.
//!
//! The pointer register selects which data register a read targets; the
//! configuration register packs the alert behaviour into a single byte.
//! Layout per the device datasheet, p.8.

use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::physical::Temperature;

/// Pointer register value selecting the temperature register (read only).
pub const TEMPERATURE_REGISTER: u8 = 0x00;

/// Pointer register value selecting the configuration register (read/write).
pub const CONFIGURATION_REGISTER: u8 = 0x01;

/// Immutable configuration snapshot for the sensor. Created once at
/// initialization and owned by the sensor interface afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorConfig {
    /// Bus address of the device.
    pub device_address: u8,

    /// Number of consecutive over-limit samples the hardware requires
    /// before asserting its alert line. The device supports 1, 2, 4 or 6.
    pub fault_queue_size: u8,

    /// Alert line polarity. Active high when true, active low when false.
    pub os_polarity: bool,

    /// Alert output mode. Interrupt mode when true, comparator mode when
    /// false.
    pub os_interrupt_mode: bool,

    /// Device operating mode. Shutdown when true, normal when false.
    pub device_shutdown: bool,
}

/// Represents errors in packing a configuration into its register layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegisterError {
    /// The fault queue size was not one of the values the hardware
    /// supports.
    #[error("Fault queue size must be 1, 2, 4 or 6!")]
    InvalidFaultQueueSize,
}

impl Default for SensorConfig {
    /// Power-on defaults of the device: fault queue of one sample, active
    /// low comparator output, normal operation.
    fn default() -> Self {
        Self {
            device_address: 0x48,
            fault_queue_size: 1,
            os_polarity: false,
            os_interrupt_mode: false,
            device_shutdown: false,
        }
    }
}

impl SensorConfig {
    /// Pack the configuration into the configuration register byte. The
    /// fault queue size lands in bits [4:3], the alert polarity in bit 2,
    /// the alert output mode in bit 1 and the operating mode in bit 0.
    pub fn encode(&self) -> Result<u8, RegisterError> {
        let fault_queue_bits: u8 = match self.fault_queue_size {
            1 => 0b00,
            2 => 0b01,
            4 => 0b10,
            6 => 0b11,
            _ => return Err(RegisterError::InvalidFaultQueueSize),
        };

        let mut byte = 0u8;
        byte |= fault_queue_bits << 3;
        byte |= (self.os_polarity as u8) << 2;
        byte |= (self.os_interrupt_mode as u8) << 1;
        byte |= self.device_shutdown as u8;
        Ok(byte)
    }
}

/// Convert a two byte big-endian temperature register read into a
/// `Temperature`. The upper 11 bits hold a two's complement count of
/// 0.125 degC steps; the arithmetic shift keeps the sign of negative
/// readings intact.
pub fn decode_temperature(bytes: [u8; 2]) -> Temperature {
    let raw = i16::from_be_bytes(bytes);
    Temperature::from_raw_steps(raw >> 5)
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_decode_positive_reading() {
        let temp = decode_temperature([0x4B, 0x00]);
        assert_eq!(temp.degrees_celsius(), 75f32);
    }

    #[test]
    fn test_decode_negative_reading() {
        // 0xC900 reads as -14080; a logical shift would turn this positive.
        let temp = decode_temperature([0xC9, 0x00]);
        assert_eq!(temp.degrees_celsius(), -55f32);

        let temp = decode_temperature([0xE7, 0x00]);
        assert_eq!(temp.degrees_celsius(), -25f32);
    }

    #[test]
    fn test_decode_ignores_bits_below_the_field() {
        assert_eq!(
            decode_temperature([0x4B, 0x1F]),
            decode_temperature([0x4B, 0x00])
        );
    }

    #[test]
    fn test_encode_fault_queue_sizes() {
        for (size, bits) in [(1u8, 0b00u8), (2, 0b01), (4, 0b10), (6, 0b11)] {
            let config = SensorConfig {
                fault_queue_size: size,
                ..SensorConfig::default()
            };
            assert_eq!(config.encode().unwrap(), bits << 3);
        }
    }

    #[test]
    fn test_encode_flag_bits() {
        let config = SensorConfig {
            fault_queue_size: 4,
            os_polarity: true,
            os_interrupt_mode: true,
            device_shutdown: true,
            ..SensorConfig::default()
        };
        assert_eq!(config.encode().unwrap(), 0b0001_0111);
    }

    #[test]
    fn test_encode_rejects_unsupported_fault_queue_sizes() {
        for size in [0u8, 3, 5, 7, 255] {
            let config = SensorConfig {
                fault_queue_size: size,
                ..SensorConfig::default()
            };
            assert_eq!(config.encode(), Err(RegisterError::InvalidFaultQueueSize));
        }
    }
}
