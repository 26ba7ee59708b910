#![cfg_attr(not(any(test, feature = "mock")), no_std)]

//! nucleo_weather - Weather Shield logger firmware core for STM32 Nucleo-144
//!
//! Coordinates the board's shared peripherals across a handful of
//! long-lived tasks: a muxed I2C sensor bus, status LEDs, and a UART that
//! carries every task's log output.

// Platform abstraction layer (traits, errors, host mocks)
pub mod platform;

// Locks, rendezvous, pool, log pipeline, fault escalation
pub mod core;

// LED bank and sensor bus
pub mod devices;

// Application, sensor, and logger task bodies
pub mod tasks;

pub mod config;
pub mod system;

pub use system::System;
