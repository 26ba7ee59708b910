//! Fixed-block message pool
//!
//! `N` blocks of `S` bytes, allocated once. Handles are linear: a
//! [`PoolBuffer`] is neither `Clone` nor `Copy`, so ownership moves from
//! producer to queue to consumer without ever being duplicated. Every
//! access and release is checked against the pool's ownership table;
//! a handle that does not name a currently owned block is reported as
//! allocator corruption.
//!
//! Each slot carries a generation that advances on every acquire. A handle
//! remembers the generation it was issued with, so a stale handle to a
//! block that has since been handed out again is still caught.
//!
//! Only the bookkeeping lives in a critical section. Block bytes are reached
//! through the owning handle, so a UART can read a frame straight out of its
//! block for the whole transfer with interrupts enabled.

use crate::core::error::{CoreError, Result};
use crate::core::traits::{EmbassyState, SharedState};
use crate::log_error;
use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

static NEXT_POOL_ID: AtomicU32 = AtomicU32::new(1);

/// Handle to one owned block
#[must_use = "a pool buffer must be released back to its pool"]
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PoolBuffer {
    pool: u32,
    index: u16,
    generation: u32,
}

/// Plain copy of a handle's identity, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawBuffer {
    pub pool: u32,
    pub index: u16,
    pub generation: u32,
}

impl PoolBuffer {
    /// Block index inside its pool
    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn raw(&self) -> RawBuffer {
        RawBuffer {
            pool: self.pool,
            index: self.index,
            generation: self.generation,
        }
    }

    /// Rebuild a handle from a copy, duplicating ownership
    #[cfg(test)]
    pub(crate) fn from_raw(raw: RawBuffer) -> Self {
        Self {
            pool: raw.pool,
            index: raw.index,
            generation: raw.generation,
        }
    }
}

struct Slots<const N: usize> {
    owned: [bool; N],
    generation: [u32; N],
    free: usize,
}

/// Bounded pool of `N` blocks, each `S` bytes
pub struct MessagePool<const N: usize, const S: usize> {
    id: u32,
    blocks: [UnsafeCell<[u8; S]>; N],
    slots: EmbassyState<Slots<N>>,
}

// Safety: a block is only reached through `block_mut`/`bytes`, which
// validate the handle first. Handles are unique per owned block and the
// returned reference borrows the handle, so no block is aliased mutably.
unsafe impl<const N: usize, const S: usize> Sync for MessagePool<N, S> {}

impl<const N: usize, const S: usize> MessagePool<N, S> {
    const INDEX_FITS: () = assert!(N <= u16::MAX as usize, "pool index must fit in u16");

    pub fn new() -> Self {
        let () = Self::INDEX_FITS;
        Self {
            id: NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed),
            blocks: core::array::from_fn(|_| UnsafeCell::new([0; S])),
            slots: EmbassyState::new(Slots {
                owned: [false; N],
                generation: [0; N],
                free: N,
            }),
        }
    }

    /// Take a free block; never waits
    pub fn acquire(&self) -> Result<PoolBuffer> {
        let id = self.id;
        self.slots.with_mut(|slots| -> Result<PoolBuffer> {
            let index = slots
                .owned
                .iter()
                .position(|owned| !owned)
                .ok_or(CoreError::ResourceExhausted)?;
            slots.owned[index] = true;
            slots.generation[index] = slots.generation[index].wrapping_add(1);
            slots.free -= 1;
            Ok(PoolBuffer {
                pool: id,
                index: index as u16,
                generation: slots.generation[index],
            })
        })
    }

    /// Return a block to the pool
    pub fn release(&self, buffer: PoolBuffer) -> Result<()> {
        let raw = buffer.raw();
        self.slots.with_mut(|slots| {
            let index = self.validate(slots, raw)?;
            slots.owned[index] = false;
            slots.free += 1;
            Ok(())
        })
    }

    /// Write access to an owned block
    pub fn block_mut<'b>(&'b self, buffer: &'b mut PoolBuffer) -> Result<&'b mut [u8; S]> {
        let index = self.slots.with(|slots| self.validate(slots, buffer.raw()))?;
        // Safety: `buffer` is the only handle to this owned block and stays
        // mutably borrowed for as long as the reference lives.
        Ok(unsafe { &mut *self.blocks[index].get() })
    }

    /// The first `len` bytes of an owned block, clamped to `S`
    pub fn bytes<'b>(&'b self, buffer: &'b PoolBuffer, len: usize) -> Result<&'b [u8]> {
        let index = self.slots.with(|slots| self.validate(slots, buffer.raw()))?;
        // Safety: writes need `&mut PoolBuffer`, which cannot coexist with
        // the shared borrow of `buffer`.
        let block = unsafe { &*self.blocks[index].get() };
        Ok(&block[..len.min(S)])
    }

    pub fn free_count(&self) -> usize {
        self.slots.with(|slots| slots.free)
    }

    pub fn owned_count(&self) -> usize {
        N - self.free_count()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub const fn block_size(&self) -> usize {
        S
    }

    fn validate(&self, slots: &Slots<N>, raw: RawBuffer) -> Result<usize> {
        let index = raw.index as usize;
        let live = raw.pool == self.id
            && index < N
            && slots.owned[index]
            && slots.generation[index] == raw.generation;
        if !live {
            log_error!(
                "pool {} corruption: handle pool={} index={} gen={}",
                self.id,
                raw.pool,
                raw.index,
                raw.generation
            );
            return Err(CoreError::AllocatorCorruption);
        }
        Ok(index)
    }
}

impl<const N: usize, const S: usize> Default for MessagePool<N, S> {
    fn default() -> Self {
        Self::new()
    }
}
