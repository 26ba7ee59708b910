//! Digital output pins
//!
//! The board drives three status LEDs (PB0 green, PB7 blue, PB14 red) and
//! the three mux lines in front of the sensor bus. Nothing reads inputs.

use crate::platform::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioMode {
    Input,
    Output,
}

/// One GPIO pin
///
/// A pin has a single owner. Pins shared between tasks (the LED bank, the
/// mux lines) are only reached through the `ResourceLock` that owns them.
pub trait GpioInterface {
    /// Drive the pin high
    ///
    /// Fails with `GpioError::InvalidMode` on a pin not set up as an output;
    /// the same holds for `set_low` and `toggle`.
    fn set_high(&mut self) -> Result<()>;

    fn set_low(&mut self) -> Result<()>;

    fn toggle(&mut self) -> Result<()>;

    /// Current output level, `true` if high
    fn is_high(&self) -> bool;

    fn mode(&self) -> GpioMode;
}
