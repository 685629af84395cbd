//! Audio Lab command-line glue
//!
//! Decode a file, run one effect through the dispatcher, encode the result
//! as WAV and report what happened. All signal processing lives in
//! `audiolab-dsp`; this crate only owns the filesystem and configuration.

pub mod commands;
pub mod config;

pub use commands::{describe_effects, inspect, process, ProcessReport, ProcessRequest};
pub use config::{AppConfig, ConfigError};
