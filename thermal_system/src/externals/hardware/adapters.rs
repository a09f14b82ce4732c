use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use common::registers::{CONFIGURATION_REGISTER, TEMPERATURE_REGISTER};
use systemstat::{Platform, System};
use tracing::trace;

use super::services::{BusError, BusTransport};

/// Hardware comparator trip point baked into the simulated device.
const OS_TRIP_CELSIUS: f32 = 80.0;

/// Hardware comparator release point below which the alert line clears.
const OS_HYSTERESIS_CELSIUS: f32 = 75.0;

/// Register level simulation of the LM75BD for running the system on a
/// development host. Temperature reads report the host cpu temperature via
/// systemstat, and the alert line follows the device's comparator
/// behaviour: assert above the trip point, release below the hysteresis
/// point.
// TODO: model the interrupt-mode alert latch.
pub struct HostSimulatedLm75bd {
    pointer_register: u8,
    configuration_register: u8,
    alert_line: Arc<AtomicBool>,
}

impl HostSimulatedLm75bd {
    pub fn new() -> Self {
        Self {
            pointer_register: TEMPERATURE_REGISTER,
            configuration_register: 0,
            alert_line: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle to the simulated alert line, shared with the watcher task.
    pub fn alert_line(&self) -> Arc<AtomicBool> {
        self.alert_line.clone()
    }

    fn sample_celsius(&self) -> Result<f32, BusError> {
        let celsius = System::new().cpu_temp().map_err(BusError::TransferFailed)?;
        Ok(celsius.clamp(-55.0, 125.0))
    }
}

impl Default for HostSimulatedLm75bd {
    fn default() -> Self {
        Self::new()
    }
}

impl BusTransport for HostSimulatedLm75bd {
    fn bus_write(&mut self, _address: u8, bytes: &[u8]) -> Result<(), BusError> {
        match *bytes {
            [register] => {
                self.pointer_register = register;
                Ok(())
            }
            [CONFIGURATION_REGISTER, value] => {
                self.pointer_register = CONFIGURATION_REGISTER;
                self.configuration_register = value;
                trace!("Simulated configuration register set to {:#04x}.", value);
                Ok(())
            }
            _ => Err(BusError::UnsupportedRequest),
        }
    }

    fn bus_read(&mut self, _address: u8, buffer: &mut [u8]) -> Result<(), BusError> {
        match (self.pointer_register, buffer.len()) {
            (TEMPERATURE_REGISTER, 2) => {
                let celsius = self.sample_celsius()?;
                if celsius > OS_TRIP_CELSIUS {
                    self.alert_line.store(true, Ordering::SeqCst);
                } else if celsius < OS_HYSTERESIS_CELSIUS {
                    self.alert_line.store(false, Ordering::SeqCst);
                }

                // Upper 11 bits of the register word, 0.125 degC per step.
                let steps = (celsius * 8.0) as i16;
                buffer.copy_from_slice(&(steps << 5).to_be_bytes());
                Ok(())
            }
            (CONFIGURATION_REGISTER, 1) => {
                buffer[0] = self.configuration_register;
                Ok(())
            }
            _ => Err(BusError::UnsupportedRequest),
        }
    }
}
