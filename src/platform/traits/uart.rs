//! UART transmit interface
//!
//! The logging UART is interrupt driven: the task hands a frame to the
//! peripheral and the peripheral's "transmit complete" interrupt reports the
//! end of the transfer through a [`TransmitCompleteHandler`].

use crate::platform::Result;

/// Line settings for the ST-Link virtual COM port (USART3)
///
/// Always 8 data bits, no parity, one stop bit.
#[derive(Debug, Clone, Copy)]
pub struct UartConfig {
    pub baud_rate: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self { baud_rate: 115_200 }
    }
}

/// Interrupt-driven UART transmitter
///
/// # Safety Invariants
///
/// - UART peripheral must be initialized before use
/// - Only one owner task per UART instance; implementations are not locked
/// - `begin_transmit` is called with interrupts enabled; the driver may
///   start the transfer straight from `data` without copying it
pub trait UartTransmitter {
    /// Start transmitting `data` and return without waiting for the wire.
    ///
    /// `data` is a pooled log block. The caller keeps it owned and unchanged
    /// until the completion is reported or its wait limit expires, so an
    /// interrupt-driven driver may keep reading from it during the transfer.
    ///
    /// Completion is reported later, exactly once, through the
    /// [`TransmitCompleteHandler`] bound to this peripheral.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Uart(UartError::Busy)` if a transfer is still
    /// in flight, or another `PlatformError::Uart` if the peripheral refused
    /// the frame.
    fn begin_transmit(&mut self, data: &[u8]) -> Result<()>;
}

/// Interrupt-side hook invoked on "transmit complete"
///
/// Implementations must not block and must not allocate: this runs in
/// interrupt context.
pub trait TransmitCompleteHandler {
    /// Report that the last accepted frame has left the peripheral
    fn on_transmit_complete(&self);
}
