//! Producer/consumer log pipeline
//!
//! Any task formats a line into a pooled block and enqueues it; one logger
//! task drains the queue onto the UART through the rendezvous transmitter.
//!
//! ```text
//!  producers                      queue (Q)                 consumer
//!  ─────────                      ─────────                 ────────
//!  pool.acquire()
//!  "[ms][task] msg\n" ──► block
//!  envelope{block,len,seq} ──►  [e0][e1][e2]..  ──► receive()
//!                                                  submit + await_completion
//!                                                  pool.release()  (always)
//! ```
//!
//! Memory is bounded by the pool: a producer that cannot get a block fails
//! with `ResourceExhausted` instead of waiting. Every error path after the
//! block is taken hands it back before returning.

use crate::config::{LoggerConfig, LOG_BUF_SIZE, LOG_QUEUE_DEPTH, NUM_LOG_BUFFERS, SCRATCH_BUF_SIZE};
use crate::core::error::{CoreError, Result};
use crate::core::fault::{DiagnosticSink, Fault, FaultIndicator};
use crate::core::format::{BlockWriter, Scratch};
use crate::core::pool::{MessagePool, PoolBuffer};
use crate::core::rendezvous::RendezvousTransmitter;
use crate::core::task::TaskId;
use crate::core::timeout::{bounded, WaitLimit};
use crate::core::traits::{EmbassyState, SharedState, TimeSource};
use crate::platform::traits::UartTransmitter;
use crate::{log_error, log_warn};
use core::convert::Infallible;
use core::fmt::Write;
use core::future::poll_fn;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};

/// What a producer does when the queue is full
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueuePolicy {
    /// Wait for a slot, at most this long
    Block(WaitLimit),
    /// Give up at once with `QueueFull`
    Fail,
}

impl Default for EnqueuePolicy {
    fn default() -> Self {
        EnqueuePolicy::Block(WaitLimit::Forever)
    }
}

/// One queued log line
#[derive(Debug)]
pub struct LogEnvelope {
    buffer: PoolBuffer,
    len: usize,
    sequence: u32,
}

impl LogEnvelope {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Position in the queue's global enqueue order
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn buffer(&self) -> &PoolBuffer {
        &self.buffer
    }
}

/// Result of servicing one envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent { sequence: u32, len: usize },
    /// UART refused the frame; the line is dropped
    TransmitFailed { sequence: u32 },
}

/// Log pipeline with `N` blocks of `S` bytes and a queue of `Q` envelopes
pub struct LogPipeline<C, const N: usize, const S: usize, const Q: usize> {
    clock: C,
    config: LoggerConfig,
    pool: MessagePool<N, S>,
    queue: Channel<CriticalSectionRawMutex, LogEnvelope, Q>,
    next_sequence: EmbassyState<u32>,
}

/// Pipeline at board sizing
pub type SystemLog<C> = LogPipeline<C, NUM_LOG_BUFFERS, LOG_BUF_SIZE, LOG_QUEUE_DEPTH>;

impl<C, const N: usize, const S: usize, const Q: usize> LogPipeline<C, N, S, Q>
where
    C: TimeSource,
{
    pub fn new(clock: C, config: LoggerConfig) -> Self {
        Self {
            clock,
            config,
            pool: MessagePool::new(),
            queue: Channel::new(),
            next_sequence: EmbassyState::new(0),
        }
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn pool(&self) -> &MessagePool<N, S> {
        &self.pool
    }

    /// Envelopes waiting for the consumer
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Log `message` on behalf of `owner` using the configured policy
    pub async fn log(&self, owner: &TaskId, message: &str) -> Result<()> {
        self.log_with_policy(owner, message, self.config.enqueue)
            .await
            .map(|_| ())
    }

    /// Log `"<message> <value>"`
    ///
    /// The line is built in a scratch string of `SCRATCH_BUF_SIZE` bytes
    /// first; anything beyond that is dropped.
    pub async fn log_with_integer(&self, owner: &TaskId, message: &str, value: u32) -> Result<()> {
        let mut scratch = Scratch::<SCRATCH_BUF_SIZE>::new();
        let _ = write!(scratch, "{} {}", message, value);
        self.log(owner, scratch.as_str()).await
    }

    /// Log `"<message> <value>"` with six decimals
    pub async fn log_with_float(&self, owner: &TaskId, message: &str, value: f32) -> Result<()> {
        let mut scratch = Scratch::<SCRATCH_BUF_SIZE>::new();
        let _ = write!(scratch, "{} {:.6}", message, value);
        self.log(owner, scratch.as_str()).await
    }

    /// Format and enqueue one line; returns its sequence number
    pub async fn log_with_policy(
        &self,
        owner: &TaskId,
        message: &str,
        policy: EnqueuePolicy,
    ) -> Result<u32> {
        let mut buffer = self.pool.acquire()?;
        let now = self.clock.now_ms();

        let formatted = self.pool.block_mut(&mut buffer).map(|block| {
            let mut w = BlockWriter::new(block);
            let _ = writeln!(w, "[{}][{}] {}", now, owner.name(), message);
            w.len()
        });
        let len = match formatted {
            Ok(0) => return Err(self.discard(buffer, CoreError::FormatFailure)),
            Ok(len) => len,
            Err(err) => return Err(self.discard(buffer, err)),
        };

        let envelope = LogEnvelope {
            buffer,
            len,
            sequence: 0,
        };
        self.enqueue(envelope, policy).await
    }

    /// Wait for the next envelope
    pub async fn dequeue(&self, limit: WaitLimit) -> Result<LogEnvelope> {
        bounded(limit, self.queue.receive()).await
    }

    pub fn try_dequeue(&self) -> Option<LogEnvelope> {
        self.queue.try_receive().ok()
    }

    /// Read the bytes of a dequeued envelope
    pub fn read_envelope<R, F>(&self, envelope: &LogEnvelope, f: F) -> Result<R>
    where
        F: FnOnce(&[u8]) -> R,
    {
        self.pool.bytes(&envelope.buffer, envelope.len).map(f)
    }

    /// Give a dequeued envelope's block back to the pool
    pub fn release(&self, envelope: LogEnvelope) -> Result<()> {
        self.pool.release(envelope.buffer)
    }

    /// Dequeue one envelope and put it on the wire
    ///
    /// The block is released whatever the UART does. A refused frame is a
    /// soft error: the indicator is raised and `TransmitFailed` returned. A
    /// completion that never arrives, or a failed release, is an error.
    pub async fn service_next<H, I>(
        &self,
        tx: &mut RendezvousTransmitter<'_, H>,
        indicator: &I,
    ) -> Result<Delivery>
    where
        H: UartTransmitter,
        I: FaultIndicator,
    {
        let LogEnvelope {
            buffer,
            len,
            sequence,
        } = self.queue.receive().await;

        // The UART reads straight from the block until completion; the block
        // stays owned until then
        let sent = match self.pool.bytes(&buffer, len) {
            Ok(frame) => match tx.submit(frame) {
                Ok(()) => tx.await_completion(self.config.transmit_timeout).await,
                Err(err) => Err(err),
            },
            Err(err) => Err(err),
        };

        if let Err(err) = self.pool.release(buffer) {
            log_error!("logger lost block of line {}", sequence);
            return Err(err);
        }

        match sent {
            Ok(()) => Ok(Delivery::Sent { sequence, len }),
            Err(CoreError::HardwareTransmitFailure) => {
                log_warn!("line {} dropped: UART refused it", sequence);
                let _ = indicator.show_soft_error().await;
                Ok(Delivery::TransmitFailed { sequence })
            }
            Err(err) => Err(err),
        }
    }

    /// Consumer loop; returns only with a fault
    pub async fn run_consumer<H, I>(
        &self,
        tx: &mut RendezvousTransmitter<'_, H>,
        indicator: &I,
    ) -> core::result::Result<Infallible, Fault>
    where
        H: UartTransmitter,
        I: FaultIndicator,
    {
        loop {
            if let Err(err) = self.service_next(tx, indicator).await {
                let reason = match err {
                    CoreError::AllocatorCorruption => "OSMemPut failed:",
                    _ => "UART transmit failed:",
                };
                return Err(Fault::with_code(reason, err));
            }
        }
    }

    fn try_enqueue(&self, mut envelope: LogEnvelope) -> core::result::Result<u32, LogEnvelope> {
        // Sequence assignment and the push happen in one critical section
        self.next_sequence.with_mut(|next| {
            envelope.sequence = *next;
            match self.queue.try_send(envelope) {
                Ok(()) => {
                    let sequence = *next;
                    *next = next.wrapping_add(1);
                    Ok(sequence)
                }
                Err(TrySendError::Full(envelope)) => Err(envelope),
            }
        })
    }

    async fn enqueue(&self, envelope: LogEnvelope, policy: EnqueuePolicy) -> Result<u32> {
        let limit = match policy {
            EnqueuePolicy::Fail => {
                return self
                    .try_enqueue(envelope)
                    .map_err(|rejected| self.discard(rejected.buffer, CoreError::QueueFull));
            }
            EnqueuePolicy::Block(limit) => limit,
        };

        // The envelope stays reachable from here so a timeout can free it
        let mut waiting = Some(envelope);
        let outcome = bounded(limit, async {
            loop {
                if let Some(envelope) = waiting.take() {
                    match self.try_enqueue(envelope) {
                        Ok(sequence) => return sequence,
                        Err(rejected) => waiting = Some(rejected),
                    }
                }
                poll_fn(|cx| self.queue.poll_ready_to_send(cx)).await;
            }
        })
        .await;

        match (outcome, waiting.take()) {
            (Ok(sequence), _) => Ok(sequence),
            (Err(err), Some(envelope)) => Err(self.discard(envelope.buffer, err)),
            (Err(err), None) => Err(err),
        }
    }

    /// Hand back a block on a producer error path
    fn discard(&self, buffer: PoolBuffer, cause: CoreError) -> CoreError {
        match self.pool.release(buffer) {
            Ok(()) => cause,
            Err(corruption) => corruption,
        }
    }
}

impl<C, const N: usize, const S: usize, const Q: usize> DiagnosticSink for LogPipeline<C, N, S, Q>
where
    C: TimeSource,
{
    async fn record_fault(&self, task: &TaskId, fault: &Fault) -> Result<()> {
        let mut scratch = Scratch::<SCRATCH_BUF_SIZE>::new();
        let _ = match fault.report_code {
            true => write!(scratch, "{} {}", fault.reason, fault.error.code()),
            false => write!(scratch, "{}", fault.reason),
        };
        // A dead logger must not hold up escalation
        self.log_with_policy(task, scratch.as_str(), EnqueuePolicy::Fail)
            .await
            .map(|_| ())
    }
}
