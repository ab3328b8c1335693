//! Core types for the vodflow upload service: error taxonomy, domain models,
//! and environment-driven configuration.

pub mod config;
pub mod error;
pub mod models;

pub use config::{Config, StorageBackend};
pub use error::{ErrorMetadata, LogLevel, PipelineError};
