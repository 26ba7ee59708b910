//! Mock interrupt-driven UART for testing

use crate::platform::{
    error::{PlatformError, UartError},
    traits::{TransmitCompleteHandler, UartConfig, UartTransmitter},
    Result,
};
use std::vec::Vec;

/// When the simulated "transmit complete" interrupt fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionMode {
    /// Fire the interrupt before `begin_transmit` returns
    Immediate,
    /// Hold the interrupt until `complete_pending` is called
    Deferred,
    /// Never fire; the peripheral stays busy forever
    Never,
}

/// Mock UART transmitter
///
/// Records every accepted frame and raises the completion interrupt on the
/// bound handler according to its [`CompletionMode`].
///
/// # Example
///
/// ```ignore
/// use nucleo_weather::core::rendezvous::RendezvousChannel;
/// use nucleo_weather::platform::mock::{CompletionMode, MockUart};
/// use nucleo_weather::platform::traits::UartTransmitter;
///
/// let channel = RendezvousChannel::new();
/// let mut uart = MockUart::new(Default::default())
///     .with_interrupt(&channel, CompletionMode::Immediate);
///
/// uart.begin_transmit(b"Hello").unwrap();
/// assert_eq!(uart.frames()[0], b"Hello");
/// assert!(channel.is_signaled());
/// ```
pub struct MockUart<'a> {
    config: UartConfig,
    frames: Vec<Vec<u8>>,
    mode: CompletionMode,
    isr: Option<&'a dyn TransmitCompleteHandler>,
    rejections: usize,
    in_flight: bool,
}

impl MockUart<'static> {
    /// Create a mock UART with no interrupt bound
    pub fn new(config: UartConfig) -> Self {
        Self {
            config,
            frames: Vec::new(),
            mode: CompletionMode::Immediate,
            isr: None,
            rejections: 0,
            in_flight: false,
        }
    }
}

impl<'a> MockUart<'a> {
    /// Bind the "transmit complete" interrupt to `isr`
    pub fn with_interrupt<'b>(
        self,
        isr: &'b dyn TransmitCompleteHandler,
        mode: CompletionMode,
    ) -> MockUart<'b> {
        MockUart {
            config: self.config,
            frames: self.frames,
            mode,
            isr: Some(isr),
            rejections: self.rejections,
            in_flight: self.in_flight,
        }
    }

    /// Change when the interrupt fires for subsequent frames
    pub fn set_mode(&mut self, mode: CompletionMode) {
        self.mode = mode;
    }

    /// Refuse the next `count` frames
    pub fn reject_next(&mut self, count: usize) {
        self.rejections = count;
    }

    /// Frames accepted so far (for test verification)
    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    /// Whether a frame is still on the wire
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Get configured baud rate
    pub fn baud_rate(&self) -> u32 {
        self.config.baud_rate
    }

    /// Fire a held interrupt (`Deferred` mode)
    ///
    /// Returns `false` if no frame was in flight.
    pub fn complete_pending(&mut self) -> bool {
        if !self.in_flight {
            return false;
        }
        self.in_flight = false;
        self.raise_interrupt();
        true
    }

    fn raise_interrupt(&self) {
        if let Some(isr) = self.isr {
            isr.on_transmit_complete();
        }
    }
}

impl UartTransmitter for MockUart<'_> {
    fn begin_transmit(&mut self, data: &[u8]) -> Result<()> {
        if self.rejections > 0 {
            self.rejections -= 1;
            return Err(PlatformError::Uart(UartError::Rejected));
        }
        if self.in_flight {
            return Err(PlatformError::Uart(UartError::Busy));
        }

        self.frames.push(data.to_vec());

        match self.mode {
            CompletionMode::Immediate => self.raise_interrupt(),
            CompletionMode::Deferred | CompletionMode::Never => self.in_flight = true,
        }
        Ok(())
    }
}
