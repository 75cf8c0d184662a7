//! # jcomp Core Library
//!
//! Shared building blocks for the jcomp crates: credential loading,
//! configuration resolution, host normalization, and terminal output.

pub mod config;
pub mod creds;
pub mod output;
pub mod url;

// Re-export main types
pub use config::{AdminConfig, Backend, ConfigDirs, get_config_dirs};
pub use creds::Credentials;
pub use output::{print_error, print_info, print_success, print_warning};
