//! Environment variable management for testing
//!
//! Guards here restore the process environment when dropped so tests don't
//! leak configuration into each other.

use std::env;
use std::path::PathBuf;

use tempfile::TempDir;

/// A test environment that overrides XDG directories to use a per-test
/// temporary directory
pub struct EnvTestGuard {
  /// The temporary directory that will be used for XDG directories
  pub temp_dir: TempDir,
  /// The original XDG_CONFIG_HOME value, if any
  original_config_home: Option<String>,
}

impl Default for EnvTestGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl EnvTestGuard {
  pub const XDG_CONFIG_HOME: &'static str = "XDG_CONFIG_HOME";

  /// Create a new test environment with an overridden config home
  pub fn new() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let original_config_home = env::var(Self::XDG_CONFIG_HOME).ok();

    let config_home = temp_dir.path().join("config");
    std::fs::create_dir_all(&config_home).expect("Failed to create config directory");
    unsafe {
      env::set_var(Self::XDG_CONFIG_HOME, &config_home);
    }

    Self {
      temp_dir,
      original_config_home,
    }
  }

  /// Get the path to the XDG config directory
  pub fn config_dir(&self) -> PathBuf {
    self.temp_dir.path().join("config")
  }
}

impl Drop for EnvTestGuard {
  fn drop(&mut self) {
    match &self.original_config_home {
      Some(val) => unsafe {
        env::set_var(EnvTestGuard::XDG_CONFIG_HOME, val);
      },
      None => unsafe {
        env::remove_var(EnvTestGuard::XDG_CONFIG_HOME);
      },
    }
  }
}

/// RAII guard for a single environment variable
///
/// The variable is cleared on creation and its original value is restored
/// when the guard is dropped.
pub struct EnvVarGuard {
  name: String,
  original: Option<String>,
}

impl EnvVarGuard {
  /// Take control of `name`, clearing any current value
  pub fn new(name: &str) -> Self {
    let original = env::var(name).ok();
    unsafe {
      env::remove_var(name);
    }
    Self {
      name: name.to_string(),
      original,
    }
  }

  /// Set the variable for the lifetime of the guard
  pub fn set(&self, value: &str) {
    unsafe {
      env::set_var(&self.name, value);
    }
  }
}

impl Drop for EnvVarGuard {
  fn drop(&mut self) {
    match &self.original {
      Some(val) => unsafe {
        env::set_var(&self.name, val);
      },
      None => unsafe {
        env::remove_var(&self.name);
      },
    }
  }
}
