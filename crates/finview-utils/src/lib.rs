//! Shared utilities for finview
//!
//! This crate provides common functionality used across the finview workspace:
//! tracing setup and small helpers for reading configuration from the environment.

pub mod env;
pub mod logging;

pub use env::{env_millis, env_string, parse_millis};
pub use logging::{init_tracing, init_tracing_with_default};
