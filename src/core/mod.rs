//! Coordination layer
//!
//! Resource locks, the UART rendezvous, the message pool, the log pipeline,
//! and per-task fault escalation.

pub mod error;
pub mod fault;
pub mod format;
pub mod lock;
pub mod log_pipeline;
pub mod logging;
pub mod pool;
pub mod rendezvous;
pub mod task;
pub mod timeout;
pub mod traits;

pub use error::CoreError;
pub use fault::{DiagnosticSink, Fault, FaultEscalation, FaultIndicator, OrFault};
pub use lock::{ResourceGuard, ResourceLock};
pub use log_pipeline::{Delivery, EnqueuePolicy, LogEnvelope, LogPipeline, SystemLog};
pub use pool::{MessagePool, PoolBuffer};
pub use rendezvous::{ChannelState, RendezvousChannel, RendezvousTransmitter};
pub use task::{TaskId, TaskRegistry, TaskState};
pub use timeout::WaitLimit;
