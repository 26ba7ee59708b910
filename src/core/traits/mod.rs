//! Core traits for platform-agnostic synchronization and timing.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │   Tasks (heartbeat, sensor, logger)                      │
//! │                         │                                │
//! │                         ▼                                │
//! │   ┌──────────────────┐  ┌──────────────────────────────┐ │
//! │   │ TimeSource       │  │ SharedState<T>               │ │
//! │   │ + now_ms()       │  │ + with(f: Fn(&T) -> R)       │ │
//! │   │                  │  │ + with_mut(f: Fn(&mut T))    │ │
//! │   └──────────────────┘  └──────────────────────────────┘ │
//! │          │                           │                   │
//! │          ▼                           ▼                   │
//! │   EmbassyTime / MockTime      EmbassyState<T>            │
//! │                          (critical-section mutex)        │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod sync;
pub mod time;

pub use sync::{EmbassyState, SharedState};
pub use time::{EmbassyTime, MockTime, TimeSource};
