//! Static system configuration
//!
//! Sizes are compile-time constants; the pool, queue, and task table are
//! const-generic over them. Runtime tunables live in the `*Config` structs,
//! each with defaults matching the board firmware.

use crate::core::log_pipeline::EnqueuePolicy;
use crate::core::timeout::WaitLimit;
use crate::platform::traits::{I2cConfig, UartConfig};
use embassy_time::Duration;

/// Scheduler tick rate
pub const TICK_RATE_HZ: u64 = 1000;

/// Blocks in the log message pool
pub const NUM_LOG_BUFFERS: usize = 16;

/// Bytes per log block
pub const LOG_BUF_SIZE: usize = 128;

/// Stack scratch used by the integer/float log helpers
pub const SCRATCH_BUF_SIZE: usize = 64;

/// Log queue capacity
pub const LOG_QUEUE_DEPTH: usize = 20;

/// Task table capacity
pub const MAX_TASKS: usize = 8;

/// Rendezvous wait per log frame, in ticks
pub const TRANSMIT_TIMEOUT_TICKS: u64 = 1000;

/// Producer wait for a queue slot, in ticks
pub const ENQUEUE_TIMEOUT_TICKS: u64 = 1000;

pub const APP_TASK_PRIO: u8 = 0;
pub const SENSOR_TASK_PRIO: u8 = 1;
pub const LOGGER_TASK_PRIO: u8 = 2;

pub const APP_TASK_POLLING_TICKS: u64 = 1000;
pub const SENSOR_TASK_POLLING_TICKS: u64 = 1000;

/// MS8607 needs this long after a reset before it answers
pub const SENSOR_RESET_SETTLE_MS: u64 = 100;

const fn ticks(ticks: u64) -> Duration {
    Duration::from_micros(ticks * 1_000_000 / TICK_RATE_HZ)
}

/// Log pipeline tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Producer behavior when the queue is full
    pub enqueue: EnqueuePolicy,
    /// Bound on each rendezvous wait in the consumer
    pub transmit_timeout: WaitLimit,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            enqueue: EnqueuePolicy::Block(WaitLimit::ticks(ENQUEUE_TIMEOUT_TICKS)),
            transmit_timeout: WaitLimit::ticks(TRANSMIT_TIMEOUT_TICKS),
        }
    }
}

/// Sensor bus tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorConfig {
    pub reset_settle: Duration,
    pub lock_wait: WaitLimit,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            reset_settle: Duration::from_millis(SENSOR_RESET_SETTLE_MS),
            lock_wait: WaitLimit::Forever,
        }
    }
}

/// Static description of one long-lived task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskConfig {
    pub name: &'static str,
    pub priority: u8,
    /// Delay between work cycles
    pub polling_interval: Duration,
}

impl TaskConfig {
    pub const fn new(name: &'static str, priority: u8, polling_interval: Duration) -> Self {
        Self {
            name,
            priority,
            polling_interval,
        }
    }
}

/// Whole-system configuration
#[derive(Debug, Clone, Copy)]
pub struct SystemConfig {
    pub logger: LoggerConfig,
    pub sensor: SensorConfig,
    pub app_task: TaskConfig,
    pub sensor_task: TaskConfig,
    pub logger_task: TaskConfig,
    pub uart: UartConfig,
    pub i2c: I2cConfig,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            logger: LoggerConfig::default(),
            sensor: SensorConfig::default(),
            app_task: TaskConfig::new(
                "Application Task",
                APP_TASK_PRIO,
                ticks(APP_TASK_POLLING_TICKS),
            ),
            sensor_task: TaskConfig::new(
                "Sensor Task",
                SENSOR_TASK_PRIO,
                ticks(SENSOR_TASK_POLLING_TICKS),
            ),
            logger_task: TaskConfig::new("Logger Task", LOGGER_TASK_PRIO, Duration::from_ticks(0)),
            uart: UartConfig::default(),
            i2c: I2cConfig::default(),
        }
    }
}
