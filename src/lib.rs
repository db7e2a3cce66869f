//! Build-time provisioned configuration for the water tank monitor
//!
//! The provisioning file (`cfg.toml`) is turned into a constant [`Config`]
//! by the build script. Firmware resolves it once at startup, validates it
//! and hands `&'static Config` to the WiFi, backend and sensor tasks.

#![no_std]

pub mod backend;
pub mod calibration;
pub mod config;
pub mod constants;
pub mod validate;

pub use backend::{Backend, BackendError};
pub use calibration::{Calibration, CalibrationError, RawReading, Reading};
pub use config::{Config, ConfigError, CONFIG};
