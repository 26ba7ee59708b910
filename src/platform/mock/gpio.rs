//! Host stand-in for an LED or mux pin

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
    Result,
};

/// Pin that remembers its level and counts successful writes, so a test
/// can tell whether a locked section actually drove it
#[derive(Debug)]
pub struct MockGpio {
    level: bool,
    mode: GpioMode,
    writes: u32,
}

impl MockGpio {
    /// Output pin, driven low
    pub fn new_output() -> Self {
        Self {
            level: false,
            mode: GpioMode::Output,
            writes: 0,
        }
    }

    /// Output pin, driven high (the mux enable line at reset)
    pub fn new_output_high() -> Self {
        Self {
            level: true,
            ..Self::new_output()
        }
    }

    /// Pin left as an input; every write fails
    pub fn new_input() -> Self {
        Self {
            mode: GpioMode::Input,
            ..Self::new_output()
        }
    }

    pub fn writes(&self) -> u32 {
        self.writes
    }

    fn drive(&mut self, level: bool) -> Result<()> {
        if self.mode != GpioMode::Output {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.level = level;
        self.writes += 1;
        Ok(())
    }
}

impl GpioInterface for MockGpio {
    fn set_high(&mut self) -> Result<()> {
        self.drive(true)
    }

    fn set_low(&mut self) -> Result<()> {
        self.drive(false)
    }

    fn toggle(&mut self) -> Result<()> {
        self.drive(!self.level)
    }

    fn is_high(&self) -> bool {
        self.level
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}
