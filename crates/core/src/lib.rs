//! Core types and configuration for the traffic-forecast system.
//!
//! This crate provides shared types used across all other crates:
//! - Raw snapshot records and the observation table
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use types::*;
