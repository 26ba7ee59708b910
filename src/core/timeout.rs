//! Bounded waits
//!
//! Every suspension point in the coordination layer takes a [`WaitLimit`].
//! An expired limit surfaces as [`CoreError::Timeout`], distinct from any
//! other failure.

use crate::config::TICK_RATE_HZ;
use crate::core::error::{CoreError, Result};
use core::future::Future;
use embassy_time::{with_timeout, Duration};

/// How long a blocking primitive may suspend the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitLimit {
    /// Wait until the event happens
    Forever,
    /// Give up after this long
    Within(Duration),
}

impl WaitLimit {
    /// Limit expressed in scheduler ticks
    pub const fn ticks(ticks: u64) -> Self {
        WaitLimit::Within(Duration::from_micros(ticks * 1_000_000 / TICK_RATE_HZ))
    }

    /// Limit expressed in milliseconds
    pub const fn millis(ms: u64) -> Self {
        WaitLimit::Within(Duration::from_millis(ms))
    }
}

impl Default for WaitLimit {
    fn default() -> Self {
        WaitLimit::Forever
    }
}

/// Run `fut` to completion or until `limit` expires
pub async fn bounded<F: Future>(limit: WaitLimit, fut: F) -> Result<F::Output> {
    match limit {
        WaitLimit::Forever => Ok(fut.await),
        WaitLimit::Within(duration) => with_timeout(duration, fut)
            .await
            .map_err(|_| CoreError::Timeout),
    }
}
