#![cfg_attr(not(test), no_std)]

pub mod console;
pub mod metrics;
pub mod sensor;
pub mod session;
pub mod settings;
pub mod telemetry;
