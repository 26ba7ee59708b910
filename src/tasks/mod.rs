//! Long-lived application tasks
//!
//! Each task body returns `Result<Infallible, Fault>` and is meant to run
//! under [`crate::core::fault::FaultEscalation::supervise`]. The board crate
//! wraps them in executor tasks.

pub mod heartbeat;
pub mod logger;
pub mod sensor;

pub use heartbeat::heartbeat_task;
pub use logger::logger_task;
pub use sensor::sensor_task;
