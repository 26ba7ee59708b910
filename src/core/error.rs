//! Core error taxonomy
//!
//! Every fallible operation in the lock, transmit, pool, and log layers
//! returns [`CoreError`]. Hardware faults from the platform layer are wrapped
//! in [`CoreError::Peripheral`].

use crate::platform::PlatformError;
use core::fmt;

/// Errors raised by the coordination layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CoreError {
    /// A bounded wait expired
    Timeout,
    /// Pool has no free buffer
    ResourceExhausted,
    /// UART refused or was already sending
    HardwareTransmitFailure,
    /// Buffer released twice or into the wrong pool
    AllocatorCorruption,
    /// Message formatted to nothing
    FormatFailure,
    /// Queue full under the fail-fast enqueue policy
    QueueFull,
    /// HAL error surfaced through a locked peripheral
    Peripheral(PlatformError),
}

impl CoreError {
    /// Numeric code written into the diagnostic log on escalation
    pub fn code(&self) -> u32 {
        match self {
            CoreError::Timeout => 1,
            CoreError::ResourceExhausted => 2,
            CoreError::HardwareTransmitFailure => 3,
            CoreError::AllocatorCorruption => 4,
            CoreError::FormatFailure => 5,
            CoreError::QueueFull => 6,
            CoreError::Peripheral(_) => 7,
        }
    }

    /// Allocator corruption cannot be contained by the caller.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CoreError::AllocatorCorruption)
    }
}

impl From<PlatformError> for CoreError {
    fn from(err: PlatformError) -> Self {
        CoreError::Peripheral(err)
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Timeout => write!(f, "Wait timed out"),
            CoreError::ResourceExhausted => write!(f, "Message pool exhausted"),
            CoreError::HardwareTransmitFailure => write!(f, "UART transmit failed"),
            CoreError::AllocatorCorruption => write!(f, "Message pool corrupted"),
            CoreError::FormatFailure => write!(f, "Message formatting failed"),
            CoreError::QueueFull => write!(f, "Log queue full"),
            CoreError::Peripheral(e) => write!(f, "Peripheral error: {}", e),
        }
    }
}

/// Result type for coordination-layer operations
pub type Result<T> = core::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::error::I2cError;

    #[test]
    fn codes_are_distinct() {
        let all = [
            CoreError::Timeout,
            CoreError::ResourceExhausted,
            CoreError::HardwareTransmitFailure,
            CoreError::AllocatorCorruption,
            CoreError::FormatFailure,
            CoreError::QueueFull,
            CoreError::Peripheral(PlatformError::InitializationFailed),
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.code(), b.code());
            }
        }
    }

    #[test]
    fn only_corruption_is_fatal() {
        assert!(CoreError::AllocatorCorruption.is_fatal());
        assert!(!CoreError::Timeout.is_fatal());
        assert!(!CoreError::HardwareTransmitFailure.is_fatal());
    }

    #[test]
    fn platform_error_wraps() {
        let err: CoreError = PlatformError::I2c(I2cError::Nack).into();
        assert_eq!(err, CoreError::Peripheral(PlatformError::I2c(I2cError::Nack)));
        assert!(format!("{}", err).starts_with("Peripheral error"));
    }
}
