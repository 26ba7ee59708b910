//! I2C bus contract
//!
//! Every Weather Shield sensor hangs off one I2C bus behind a 4:1 mux, so
//! the bus is only ever touched while the sensor lock is held.

use crate::platform::Result;

#[derive(Debug, Clone, Copy)]
pub struct I2cConfig {
    /// SCL frequency in Hz
    pub frequency: u32,
    /// Per-transfer timeout handed to the HAL, in milliseconds
    pub timeout_ms: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            frequency: 100_000,
            timeout_ms: 100,
        }
    }
}

/// Asynchronous 7-bit I2C master
///
/// Any failure (NACK, bus error, HAL timeout) comes back as
/// `PlatformError::I2c`.
#[allow(async_fn_in_trait)]
pub trait I2cInterface {
    async fn write(&mut self, addr: u8, data: &[u8]) -> Result<()>;

    async fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()>;

    /// Command write followed by a read under a repeated START
    async fn write_read(&mut self, addr: u8, command: &[u8], buffer: &mut [u8]) -> Result<()>;
}
