//! Mutually exclusive access to a shared peripheral group
//!
//! A [`ResourceLock`] wraps the peripheral handle itself, so the only way to
//! reach the hardware is through a [`ResourceGuard`]. Acquisition may suspend
//! the caller and is bounded by a [`WaitLimit`].
//!
//! The lock is not reentrant: a task that acquires a lock it already holds
//! waits on itself until its limit expires (or forever).
//!
//! # Example
//!
//! ```ignore
//! static LEDS: ResourceLock<Pins> = ResourceLock::new("led", pins);
//!
//! let mut pins = LEDS.acquire(WaitLimit::Forever).await?;
//! pins.green.set_high()?;
//! pins.release()?;
//! ```

use crate::core::error::Result;
use crate::core::timeout::{bounded, WaitLimit};
use crate::log_debug;
use core::ops::{Deref, DerefMut};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};

/// Async mutex guarding a peripheral group
pub struct ResourceLock<T> {
    name: &'static str,
    inner: Mutex<CriticalSectionRawMutex, T>,
}

impl<T> ResourceLock<T> {
    /// Create a lock around `resource`
    pub const fn new(name: &'static str, resource: T) -> Self {
        Self {
            name,
            inner: Mutex::new(resource),
        }
    }

    /// Lock name, used in diagnostics
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Acquire exclusive access, suspending for at most `limit`
    pub async fn acquire(&self, limit: WaitLimit) -> Result<ResourceGuard<'_, T>> {
        match bounded(limit, self.inner.lock()).await {
            Ok(guard) => Ok(ResourceGuard { guard }),
            Err(err) => {
                log_debug!("lock '{}' acquire timed out", self.name);
                Err(err)
            }
        }
    }

    /// Run `f` between a matched acquire and release
    pub async fn with_lock<R, F>(&self, limit: WaitLimit, f: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut guard = self.acquire(limit).await?;
        let out = f(&mut *guard);
        guard.release()?;
        Ok(out)
    }
}

/// Proof of exclusive access; dropping it releases the lock
pub struct ResourceGuard<'a, T> {
    guard: MutexGuard<'a, CriticalSectionRawMutex, T>,
}

impl<T> ResourceGuard<'_, T> {
    /// Release the lock explicitly
    pub fn release(self) -> Result<()> {
        drop(self.guard);
        Ok(())
    }
}

impl<T> Deref for ResourceGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> DerefMut for ResourceGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}
