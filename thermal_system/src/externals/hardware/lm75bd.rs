use common::{
    physical::Temperature,
    registers::{self, RegisterError, SensorConfig, CONFIGURATION_REGISTER, TEMPERATURE_REGISTER},
};
use thiserror::Error;

use super::services::{BusError, BusTransport};

/// Sensor interface for the LM75BD digital temperature sensor. Owns the
/// bus handle and the configuration snapshot; the dispatcher task is its
/// only caller, so no locking is layered on top of the transport.
pub struct Lm75bd<B: BusTransport> {
    bus: B,
    config: SensorConfig,
}

/// Represents errors in talking to the sensor.
#[derive(Error, Debug)]
pub enum SensorError {
    /// The configuration could not be packed into its register layout.
    #[error("Invalid sensor configuration: {0}")]
    InvalidConfig(RegisterError),

    /// A bus phase failed. The whole operation is aborted; retrying is
    /// left to the caller.
    #[error("Sensor bus transaction failed: {0}")]
    Bus(#[from] BusError),
}

impl<B: BusTransport> Lm75bd<B> {
    pub fn new(bus: B, config: SensorConfig) -> Self {
        Self { bus, config }
    }

    /// Apply the configuration snapshot to the device: register address
    /// and packed configuration byte as a single two byte write.
    pub fn apply_config(&mut self) -> Result<(), SensorError> {
        let encoded = self.config.encode().map_err(SensorError::InvalidConfig)?;
        self.bus.bus_write(
            self.config.device_address,
            &[CONFIGURATION_REGISTER, encoded],
        )?;
        Ok(())
    }

    /// Read the current temperature. Selects the temperature register with
    /// a one byte pointer write, then reads the two data bytes. Exactly one
    /// write followed by one read, in that order; a failed phase aborts the
    /// whole read.
    pub fn read_temperature(&mut self) -> Result<Temperature, SensorError> {
        self.bus
            .bus_write(self.config.device_address, &[TEMPERATURE_REGISTER])?;

        let mut buffer = [0u8; 2];
        self.bus.bus_read(self.config.device_address, &mut buffer)?;

        Ok(registers::decode_temperature(buffer))
    }
}

#[cfg(test)]
pub mod tests {
    use std::io;

    use super::*;

    /// Scripted transport which records every transaction and replays a
    /// fixed temperature register image.
    struct ScriptedBus {
        temperature_bytes: [u8; 2],
        fail_writes: bool,
        fail_reads: bool,
        writes: Vec<Vec<u8>>,
        reads: usize,
    }

    impl ScriptedBus {
        fn new(temperature_bytes: [u8; 2]) -> Self {
            Self {
                temperature_bytes,
                fail_writes: false,
                fail_reads: false,
                writes: Vec::new(),
                reads: 0,
            }
        }
    }

    impl BusTransport for &mut ScriptedBus {
        fn bus_write(&mut self, _address: u8, bytes: &[u8]) -> Result<(), BusError> {
            if self.fail_writes {
                return Err(BusError::TransferFailed(io::Error::new(
                    io::ErrorKind::Other,
                    "write nacked",
                )));
            }
            self.writes.push(bytes.to_vec());
            Ok(())
        }

        fn bus_read(&mut self, _address: u8, buffer: &mut [u8]) -> Result<(), BusError> {
            if self.fail_reads {
                return Err(BusError::TransferFailed(io::Error::new(
                    io::ErrorKind::Other,
                    "read nacked",
                )));
            }
            self.reads += 1;
            buffer.copy_from_slice(&self.temperature_bytes);
            Ok(())
        }
    }

    #[test]
    fn test_read_selects_temperature_register_then_reads() {
        let mut bus = ScriptedBus::new([0x4B, 0x00]);
        let mut sensor = Lm75bd::new(&mut bus, SensorConfig::default());

        let temp = sensor
            .read_temperature()
            .expect("Failed to read temperature.");
        assert_eq!(temp.degrees_celsius(), 75f32);

        assert_eq!(bus.writes, vec![vec![TEMPERATURE_REGISTER]]);
        assert_eq!(bus.reads, 1);
    }

    #[test]
    fn test_failed_pointer_write_aborts_before_the_read() {
        let mut bus = ScriptedBus::new([0x4B, 0x00]);
        bus.fail_writes = true;
        let mut sensor = Lm75bd::new(&mut bus, SensorConfig::default());

        let result = sensor.read_temperature();
        assert!(matches!(result, Err(SensorError::Bus(_))));
        assert_eq!(bus.reads, 0);
    }

    #[test]
    fn test_failed_data_read_propagates() {
        let mut bus = ScriptedBus::new([0x4B, 0x00]);
        bus.fail_reads = true;
        let mut sensor = Lm75bd::new(&mut bus, SensorConfig::default());

        let result = sensor.read_temperature();
        assert!(matches!(result, Err(SensorError::Bus(_))));
        assert_eq!(bus.writes, vec![vec![TEMPERATURE_REGISTER]]);
    }

    #[test]
    fn test_apply_config_writes_register_address_and_payload() {
        let mut bus = ScriptedBus::new([0x00, 0x00]);
        let config = SensorConfig {
            fault_queue_size: 2,
            ..SensorConfig::default()
        };
        let mut sensor = Lm75bd::new(&mut bus, config);

        sensor.apply_config().expect("Failed to apply configuration.");

        assert_eq!(bus.writes, vec![vec![CONFIGURATION_REGISTER, 0b0000_1000]]);
    }

    #[test]
    fn test_apply_config_rejects_bad_fault_queue_size_without_bus_traffic() {
        let mut bus = ScriptedBus::new([0x00, 0x00]);
        let config = SensorConfig {
            fault_queue_size: 3,
            ..SensorConfig::default()
        };
        let mut sensor = Lm75bd::new(&mut bus, config);

        let result = sensor.apply_config();
        assert!(matches!(result, Err(SensorError::InvalidConfig(_))));
        assert!(bus.writes.is_empty());
    }
}
