//! Fail-stop escalation
//!
//! A task body returns `Result<Infallible, Fault>`: it only ever comes back
//! with a fault. [`FaultEscalation::supervise`] is the per-task catch point
//! that turns that fault into the terminal sequence:
//!
//! 1. enqueue a diagnostic log line (best effort)
//! 2. raise the fault indicator (best effort)
//! 3. mark the task `Faulted` and park it forever
//!
//! Only the failing task stops. Everything else keeps running.

use crate::core::error::{CoreError, Result};
use crate::core::task::{TaskId, TaskRegistry, TaskState};
use crate::log_error;
use core::convert::Infallible;
use core::future::{pending, Future};

/// Why a task gave up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fault {
    /// Short description, logged verbatim
    pub reason: &'static str,
    pub error: CoreError,
    /// Append `error.code()` to the diagnostic line
    pub report_code: bool,
}

impl Fault {
    /// Fault logged as its reason alone
    pub const fn new(reason: &'static str, error: CoreError) -> Self {
        Self {
            reason,
            error,
            report_code: false,
        }
    }

    /// Fault logged as `"<reason> <code>"`
    pub const fn with_code(reason: &'static str, error: CoreError) -> Self {
        Self {
            reason,
            error,
            report_code: true,
        }
    }
}

/// Attach a fault reason to a fallible result
pub trait OrFault<T> {
    fn or_fault(self, reason: &'static str) -> core::result::Result<T, Fault>;

    /// Like `or_fault`, but the diagnostic line carries the error code
    fn or_fault_code(self, reason: &'static str) -> core::result::Result<T, Fault>;
}

impl<T, E: Into<CoreError>> OrFault<T> for core::result::Result<T, E> {
    fn or_fault(self, reason: &'static str) -> core::result::Result<T, Fault> {
        self.map_err(|e| Fault::new(reason, e.into()))
    }

    fn or_fault_code(self, reason: &'static str) -> core::result::Result<T, Fault> {
        self.map_err(|e| Fault::with_code(reason, e.into()))
    }
}

/// Destination for the diagnostic line written on escalation
#[allow(async_fn_in_trait)]
pub trait DiagnosticSink {
    async fn record_fault(&self, task: &TaskId, fault: &Fault) -> Result<()>;
}

/// Visible status output
#[allow(async_fn_in_trait)]
pub trait FaultIndicator {
    /// A task has stopped for good
    async fn show_fault(&self) -> Result<()>;

    /// A recoverable hardware error happened
    async fn show_soft_error(&self) -> Result<()>;
}

/// Outcome of the best-effort escalation steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationReport {
    pub logged: Result<()>,
    pub indicated: Result<()>,
    /// State before escalation; `None` if the task is not registered
    pub previous: Option<TaskState>,
}

/// Shared escalation entry point
pub struct FaultEscalation<'a, D, I, const T: usize> {
    sink: &'a D,
    indicator: &'a I,
    registry: &'a TaskRegistry<T>,
}

impl<'a, D, I, const T: usize> FaultEscalation<'a, D, I, T>
where
    D: DiagnosticSink,
    I: FaultIndicator,
{
    pub fn new(sink: &'a D, indicator: &'a I, registry: &'a TaskRegistry<T>) -> Self {
        Self {
            sink,
            indicator,
            registry,
        }
    }

    /// Run the escalation steps without parking the caller
    ///
    /// Every step is attempted even when an earlier one fails.
    pub async fn signal(&self, task: &TaskId, fault: &Fault) -> EscalationReport {
        log_error!(
            "task '{}' faulted: {} ({:?})",
            task.name(),
            fault.reason,
            fault.error
        );

        let logged = self.sink.record_fault(task, fault).await;
        let indicated = self.indicator.show_fault().await;
        let previous = self.registry.mark_faulted(task);

        EscalationReport {
            logged,
            indicated,
            previous,
        }
    }

    /// Escalate and suspend the calling task permanently
    pub async fn escalate(&self, task: &TaskId, fault: Fault) -> Infallible {
        self.signal(task, &fault).await;
        pending().await
    }

    /// Drive a task body; if it faults, escalate
    pub async fn supervise<F>(&self, task: TaskId, body: F) -> Infallible
    where
        F: Future<Output = core::result::Result<Infallible, Fault>>,
    {
        match body.await {
            Ok(never) => match never {},
            Err(fault) => self.escalate(&task, fault).await,
        }
    }
}
