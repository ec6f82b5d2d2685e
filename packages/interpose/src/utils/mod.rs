// packages/interpose/src/utils/mod.rs
//! Shared utilities: configuration and error types

pub mod config;
pub mod errors;

pub use config::{InterposeConfig, LoggingConfig, RegistryConfig};
pub use errors::{InterposeError, Result};
