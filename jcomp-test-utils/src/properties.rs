use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// RAII guard for a temporary credentials properties file
///
/// Creates `credentials.properties` with the given content inside a fresh
/// temporary directory. The directory is removed when the guard is dropped.
pub struct PropertiesGuard {
  temp_dir: TempDir,
  path: PathBuf,
}

impl PropertiesGuard {
  /// Create a new PropertiesGuard with the given content
  pub fn new(content: &str) -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("credentials.properties");
    fs::write(&path, content).expect("Failed to write test properties");

    Self { temp_dir, path }
  }

  /// Create a guard holding the given user name and password
  pub fn with_credentials(username: &str, password: &str) -> Self {
    Self::new(&format!("userName={username}\npassword={password}\n"))
  }

  /// Get the path to the properties file
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Get the path to the temporary directory
  pub fn dir(&self) -> &Path {
    self.temp_dir.path()
  }
}
