//! Test utilities shared across the jcomp workspace
//!
//! This crate provides common testing infrastructure including:
//! - XDG directory isolation ([`EnvTestGuard`])
//! - Single environment variable overrides ([`EnvVarGuard`])
//! - Temporary credential files ([`PropertiesGuard`])
//!
//! The dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod env;
pub mod properties;

// Re-export commonly used items
pub use env::{EnvTestGuard, EnvVarGuard};
pub use properties::PropertiesGuard;
