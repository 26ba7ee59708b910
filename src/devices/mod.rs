//! Device drivers
//!
//! Drivers built on the platform traits, each guarding its shared hardware
//! with a `ResourceLock`.
//!
//! ## Modules
//!
//! - `led`: status LEDs (heartbeat and fault lamp)
//! - `sensor`: muxed Weather Shield sensor bus

pub mod led;
pub mod sensor;

pub use led::{Led, LedBank, LedPins};
pub use sensor::{EnvironmentalSensor, MuxLines, Sensor, SensorBus, SensorData};
