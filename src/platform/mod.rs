//! Platform abstraction layer
//!
//! Peripheral contracts the core relies on. Register-level bring-up (clock
//! tree, pin muxing, vendor HAL init) belongs to the board crate, which
//! implements these traits.

pub mod error;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, Result};
pub use traits::{GpioInterface, I2cInterface, TransmitCompleteHandler, UartTransmitter};
