//! Mock platform implementation for testing
//!
//! Mock peripherals for host tests, usable without hardware.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled

#![cfg(any(test, feature = "mock"))]

mod gpio;
mod i2c;
mod uart;

pub use gpio::MockGpio;
pub use i2c::{I2cTransaction, MockI2c};
pub use uart::{CompletionMode, MockUart};
