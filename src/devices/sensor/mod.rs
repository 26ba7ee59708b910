//! Weather Shield sensor bus
//!
//! The shield's sensors share one I2C bus behind a 4:1 mux, because several
//! of them answer on the same address. The bus, the mux lines, and the
//! sensor drivers sit behind one `ResourceLock`: a caller selects its sensor
//! and talks to it in a single critical section.
//!
//! ```text
//!   MCU ── I2C ──► [ mux ] ──► MS8607  (A=1, B=0)
//!                    ▲ ▲ ▲
//!          enable(/) ┘ │ └ select B
//!                   select A
//! ```
//!
//! Only the MS8607 channel is wired up. Its wire protocol lives behind
//! [`EnvironmentalSensor`].

#[cfg(any(test, feature = "mock"))]
pub mod mock;

use crate::config::SensorConfig;
use crate::core::error::{CoreError, Result};
use crate::core::lock::ResourceLock;
use crate::platform::error::{I2cError, PlatformError};
use crate::platform::traits::{GpioInterface, I2cInterface};
use embassy_time::Timer;

/// Sensor on the shield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sensor {
    /// TE MS8607 pressure/temperature/humidity
    Ms8607,
}

/// One measurement; a field is `None` when the sensor does not report it
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorData {
    /// Degrees Celsius
    pub temperature: Option<f32>,
    /// Percent relative humidity
    pub humidity: Option<f32>,
    /// Millibar
    pub pressure: Option<f32>,
}

/// Wire-protocol driver for one sensor
#[allow(async_fn_in_trait)]
pub trait EnvironmentalSensor<I: I2cInterface> {
    /// Whether the device acknowledges its address
    async fn is_connected(&mut self, i2c: &mut I) -> bool;

    /// Issue a soft reset
    async fn reset(&mut self, i2c: &mut I) -> crate::platform::Result<()>;

    /// Take one measurement
    async fn read(&mut self, i2c: &mut I) -> crate::platform::Result<SensorData>;
}

/// Mux control lines
pub struct MuxLines<G> {
    /// Active low
    pub enable: G,
    pub select_a: G,
    pub select_b: G,
}

impl<G: GpioInterface> MuxLines<G> {
    fn select(&mut self, sensor: Sensor) -> Result<()> {
        match sensor {
            Sensor::Ms8607 => {
                self.select_a.set_high()?;
                self.select_b.set_low()?;
            }
        }
        Ok(())
    }
}

/// Everything the sensor lock guards
pub struct SensorHardware<I, G, D> {
    pub i2c: I,
    pub mux: MuxLines<G>,
    pub ms8607: D,
}

/// Lock-guarded sensor bus
pub struct SensorBus<I, G, D> {
    hw: ResourceLock<SensorHardware<I, G, D>>,
    config: SensorConfig,
}

impl<I, G, D> SensorBus<I, G, D>
where
    I: I2cInterface,
    G: GpioInterface,
    D: EnvironmentalSensor<I>,
{
    /// Enable the mux and wrap the bus in its lock
    ///
    /// Called once during bring-up, before any task runs.
    pub fn init(i2c: I, mut mux: MuxLines<G>, ms8607: D, config: SensorConfig) -> Result<Self> {
        mux.enable.set_low()?;

        Ok(Self {
            hw: ResourceLock::new("Sensor Mutex", SensorHardware { i2c, mux, ms8607 }),
            config,
        })
    }

    pub fn lock(&self) -> &ResourceLock<SensorHardware<I, G, D>> {
        &self.hw
    }

    /// Reset `sensor` and wait for it to settle
    ///
    /// The lock stays held through the settle delay so no other task talks
    /// to a sensor that is still coming up.
    pub async fn reset(&self, sensor: Sensor) -> Result<()> {
        let mut hw = self.hw.acquire(self.config.lock_wait).await?;
        hw.mux.select(sensor)?;

        let SensorHardware { i2c, ms8607, .. } = &mut *hw;
        match sensor {
            Sensor::Ms8607 => {
                if !ms8607.is_connected(i2c).await {
                    return Err(CoreError::Peripheral(PlatformError::I2c(I2cError::Nack)));
                }
                ms8607.reset(i2c).await?;
                Timer::after(self.config.reset_settle).await;
            }
        }

        hw.release()
    }

    /// Read one measurement from `sensor`
    pub async fn read(&self, sensor: Sensor) -> Result<SensorData> {
        let mut hw = self.hw.acquire(self.config.lock_wait).await?;
        hw.mux.select(sensor)?;

        let SensorHardware { i2c, ms8607, .. } = &mut *hw;
        let data = match sensor {
            Sensor::Ms8607 => ms8607.read(i2c).await?,
        };

        hw.release()?;
        Ok(data)
    }
}
