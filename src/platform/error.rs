//! Platform error types
//!
//! Board bindings translate vendor HAL status codes (`HAL_BUSY`,
//! `HAL_ERROR`, `HAL_TIMEOUT`) into these variants before they reach the
//! core.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Peripheral failure, tagged with the peripheral that reported it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlatformError {
    Uart(UartError),
    I2c(I2cError),
    Gpio(GpioError),
    /// Clock, pin or peripheral bring-up failed before the scheduler started
    InitializationFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    /// A frame is still on the wire
    Busy,
    /// The peripheral refused the frame outright
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cError {
    /// Addressed device did not acknowledge
    Nack,
    BusError,
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Write to a pin that is not configured as an output
    InvalidMode,
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Uart(UartError::Busy) => f.write_str("UART busy"),
            PlatformError::Uart(UartError::Rejected) => f.write_str("UART rejected frame"),
            PlatformError::I2c(e) => write!(f, "I2C {:?}", e),
            PlatformError::Gpio(e) => write!(f, "GPIO {:?}", e),
            PlatformError::InitializationFailed => f.write_str("bring-up failed"),
        }
    }
}
