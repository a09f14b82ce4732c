use std::io;

use thiserror::Error;

/// This service separates the raw bus transport from the sensor logic,
/// which makes the sensor interface easier to unit test against scripted
/// transports.
pub trait BusTransport {
    /// Write `bytes` to the device at `address` as one transaction.
    fn bus_write(&mut self, address: u8, bytes: &[u8]) -> Result<(), BusError>;

    /// Read exactly `buffer.len()` bytes from the device at `address` as
    /// one transaction.
    fn bus_read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), BusError>;
}

/// Represents errors raised by a bus transport.
#[derive(Error, Debug)]
pub enum BusError {
    /// The transfer did not complete. Carries the underlying transport
    /// error.
    #[error("Bus transfer failed.")]
    TransferFailed(#[from] io::Error),

    /// The device cannot serve the requested register or length.
    #[error("Unsupported bus request.")]
    UnsupportedRequest,
}
