//! Mock MS8607 driver
//!
//! Talks to the bus like the real part (address probe, reset command,
//! conversion command) so bus errors propagate, but returns canned readings.

use super::{EnvironmentalSensor, SensorData};
use crate::platform::traits::I2cInterface;
use crate::platform::Result;

/// MS8607 pressure/temperature address
pub const MS8607_ADDR: u8 = 0x76;
pub const CMD_RESET: u8 = 0x1E;
pub const CMD_CONVERT: u8 = 0x48;

/// Canned MS8607
#[derive(Debug, Clone)]
pub struct MockSensor {
    connected: bool,
    reading: SensorData,
    resets: u32,
    reads: u32,
}

impl MockSensor {
    pub fn new() -> Self {
        Self {
            connected: true,
            reading: SensorData {
                temperature: Some(20.0),
                humidity: Some(50.0),
                pressure: Some(1000.0),
            },
            resets: 0,
            reads: 0,
        }
    }

    /// A sensor that never acknowledges its address
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            ..Self::new()
        }
    }

    pub fn with_reading(mut self, reading: SensorData) -> Self {
        self.reading = reading;
        self
    }

    pub fn resets(&self) -> u32 {
        self.resets
    }

    pub fn reads(&self) -> u32 {
        self.reads
    }
}

impl Default for MockSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: I2cInterface> EnvironmentalSensor<I> for MockSensor {
    async fn is_connected(&mut self, i2c: &mut I) -> bool {
        self.connected && i2c.write(MS8607_ADDR, &[]).await.is_ok()
    }

    async fn reset(&mut self, i2c: &mut I) -> Result<()> {
        i2c.write(MS8607_ADDR, &[CMD_RESET]).await?;
        self.resets += 1;
        Ok(())
    }

    async fn read(&mut self, i2c: &mut I) -> Result<SensorData> {
        i2c.write(MS8607_ADDR, &[CMD_CONVERT]).await?;
        self.reads += 1;
        Ok(self.reading)
    }
}
