//! Status LEDs
//!
//! Three user LEDs share one GPIO port, so every write goes through a single
//! `ResourceLock`. Green is the application heartbeat and Red the fault
//! lamp; Blue is free for application use.

use crate::core::error::Result;
use crate::core::fault::FaultIndicator;
use crate::core::lock::ResourceLock;
use crate::core::timeout::WaitLimit;
use crate::platform::traits::GpioInterface;

/// User LED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Led {
    Green,
    Blue,
    Red,
}

/// Pins driving the LEDs (active high)
pub struct LedPins<G> {
    pub green: G,
    pub blue: G,
    pub red: G,
}

impl<G> LedPins<G> {
    fn pin(&self, led: Led) -> &G {
        match led {
            Led::Green => &self.green,
            Led::Blue => &self.blue,
            Led::Red => &self.red,
        }
    }

    fn pin_mut(&mut self, led: Led) -> &mut G {
        match led {
            Led::Green => &mut self.green,
            Led::Blue => &mut self.blue,
            Led::Red => &mut self.red,
        }
    }
}

/// Lock-guarded LED bank
pub struct LedBank<G> {
    pins: ResourceLock<LedPins<G>>,
    lock_wait: WaitLimit,
}

impl<G: GpioInterface> LedBank<G> {
    /// Drive every LED low and wrap the pins in their lock
    ///
    /// Called once during bring-up, before any task runs.
    pub fn init(mut pins: LedPins<G>) -> Result<Self> {
        pins.green.set_low()?;
        pins.blue.set_low()?;
        pins.red.set_low()?;

        Ok(Self {
            pins: ResourceLock::new("LED Mutex", pins),
            lock_wait: WaitLimit::Forever,
        })
    }

    /// Bound how long each operation waits for the lock
    pub fn with_lock_wait(mut self, limit: WaitLimit) -> Self {
        self.lock_wait = limit;
        self
    }

    pub fn lock(&self) -> &ResourceLock<LedPins<G>> {
        &self.pins
    }

    pub async fn on(&self, led: Led) -> Result<()> {
        let mut pins = self.pins.acquire(self.lock_wait).await?;
        pins.pin_mut(led).set_high()?;
        pins.release()
    }

    pub async fn off(&self, led: Led) -> Result<()> {
        let mut pins = self.pins.acquire(self.lock_wait).await?;
        pins.pin_mut(led).set_low()?;
        pins.release()
    }

    pub async fn toggle(&self, led: Led) -> Result<()> {
        let mut pins = self.pins.acquire(self.lock_wait).await?;
        pins.pin_mut(led).toggle()?;
        pins.release()
    }

    pub async fn is_on(&self, led: Led) -> Result<bool> {
        let pins = self.pins.acquire(self.lock_wait).await?;
        let level = pins.pin(led).is_high();
        pins.release()?;
        Ok(level)
    }
}

impl<G: GpioInterface> FaultIndicator for LedBank<G> {
    async fn show_fault(&self) -> Result<()> {
        self.on(Led::Red).await
    }

    async fn show_soft_error(&self) -> Result<()> {
        self.on(Led::Red).await
    }
}
