//! Interrupt-driven UART transmit rendezvous
//!
//! The owning task submits a frame and suspends; the "transmit complete"
//! interrupt wakes it exactly once per frame.
//!
//! ```text
//!   task                         ISR
//!   ────                         ───
//!   submit(frame) ──► Idle→Sending
//!   await_completion ─┐
//!                     │  ◄── on_transmit_complete()
//!   Sending→Idle  ◄───┘
//! ```
//!
//! A wait that times out leaves the transmitter in `Sending`. There is no
//! abort path; every later `submit` is refused and the owner escalates.

use crate::core::error::{CoreError, Result};
use crate::core::timeout::{bounded, WaitLimit};
use crate::platform::traits::{TransmitCompleteHandler, UartTransmitter};
use crate::{log_error, log_warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Binary completion signal shared between the ISR and the owning task
pub struct RendezvousChannel {
    complete: Signal<CriticalSectionRawMutex, ()>,
}

impl RendezvousChannel {
    pub const fn new() -> Self {
        Self {
            complete: Signal::new(),
        }
    }

    /// Whether a completion is waiting to be consumed
    pub fn is_signaled(&self) -> bool {
        self.complete.signaled()
    }
}

impl Default for RendezvousChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl TransmitCompleteHandler for RendezvousChannel {
    fn on_transmit_complete(&self) {
        self.complete.signal(());
    }
}

/// Transmitter state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelState {
    Idle,
    Sending,
}

/// Task side of the rendezvous, bound to one UART and one channel
///
/// Single owner: the transmitter is not internally locked and takes
/// `&mut self` for every operation.
pub struct RendezvousTransmitter<'a, H: UartTransmitter> {
    hardware: H,
    channel: &'a RendezvousChannel,
    state: ChannelState,
}

impl<'a, H: UartTransmitter> RendezvousTransmitter<'a, H> {
    pub fn new(hardware: H, channel: &'a RendezvousChannel) -> Self {
        Self {
            hardware,
            channel,
            state: ChannelState::Idle,
        }
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }

    /// Start an interrupt-driven transfer of `data`
    ///
    /// Refused with `HardwareTransmitFailure` if a transfer is already
    /// outstanding or the UART rejects the frame; the state is unchanged.
    pub fn submit(&mut self, data: &[u8]) -> Result<()> {
        if self.state == ChannelState::Sending {
            return Err(CoreError::HardwareTransmitFailure);
        }

        // Drop any completion left over from before this frame
        self.channel.complete.reset();

        self.hardware.begin_transmit(data).map_err(|e| {
            log_warn!("UART rejected frame: {:?}", e);
            CoreError::HardwareTransmitFailure
        })?;

        self.state = ChannelState::Sending;
        Ok(())
    }

    /// Suspend until the ISR signals completion or `limit` expires
    pub async fn await_completion(&mut self, limit: WaitLimit) -> Result<()> {
        if self.state == ChannelState::Idle {
            return Ok(());
        }

        if let Err(err) = bounded(limit, self.channel.complete.wait()).await {
            log_error!("UART completion never arrived");
            return Err(err);
        }

        self.state = ChannelState::Idle;
        Ok(())
    }
}
