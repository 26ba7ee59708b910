//! Time abstraction for log timestamps.
//!
//! The log pipeline stamps every message with the scheduler tick count. The
//! `TimeSource` trait lets host tests substitute a controllable clock.

use core::cell::Cell;

/// Platform-agnostic time source.
///
/// - `EmbassyTime` reads the embassy-time driver
/// - `MockTime` for host testing with controllable time
pub trait TimeSource: Clone + Send + Sync {
    /// Returns current time in milliseconds since system start.
    ///
    /// With the 1 kHz scheduler tick this is the tick count.
    fn now_ms(&self) -> u64;
}

/// Time source backed by the embassy-time driver.
#[derive(Clone, Copy, Default)]
pub struct EmbassyTime;

impl TimeSource for EmbassyTime {
    fn now_ms(&self) -> u64 {
        embassy_time::Instant::now().as_millis()
    }
}

/// Mock time source for testing with controllable time advancement.
///
/// # Example
///
/// ```
/// use nucleo_weather::core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// assert_eq!(time.now_ms(), 0);
///
/// time.advance(1500); // Advance 1.5ms
/// assert_eq!(time.now_ms(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockTime {
    current_us: Cell<u64>,
}

// Safety: MockTime is only used in single-threaded test contexts
// where Cell is safe. The Send+Sync bounds on TimeSource trait
// are required for embedded contexts, but MockTime is not used there.
unsafe impl Send for MockTime {}
unsafe impl Sync for MockTime {}

impl MockTime {
    /// Creates a new `MockTime` starting at time 0.
    pub fn new() -> Self {
        Self {
            current_us: Cell::new(0),
        }
    }

    /// Creates a new `MockTime` starting at the specified time.
    pub fn with_initial(us: u64) -> Self {
        Self {
            current_us: Cell::new(us),
        }
    }

    /// Advances the current time by the specified amount.
    pub fn advance(&self, us: u64) {
        self.current_us.set(self.current_us.get() + us);
    }
}

impl TimeSource for MockTime {
    fn now_ms(&self) -> u64 {
        self.current_us.get() / 1000
    }
}
