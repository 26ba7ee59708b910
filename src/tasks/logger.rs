//! Logger task: the only reader of the log queue

use crate::core::fault::{Fault, FaultIndicator};
use crate::core::log_pipeline::LogPipeline;
use crate::core::rendezvous::RendezvousTransmitter;
use crate::core::traits::TimeSource;
use crate::platform::traits::UartTransmitter;
use core::convert::Infallible;

/// Drain the log queue onto the UART until something fatal happens
pub async fn logger_task<C, H, I, const N: usize, const S: usize, const Q: usize>(
    log: &LogPipeline<C, N, S, Q>,
    tx: &mut RendezvousTransmitter<'_, H>,
    indicator: &I,
) -> Result<Infallible, Fault>
where
    C: TimeSource,
    H: UartTransmitter,
    I: FaultIndicator,
{
    log.run_consumer(tx, indicator).await
}
