//! # Credential Management
//!
//! Loading of the JIRA username/password pair. Credentials are an explicit
//! value handed to whichever client needs them; nothing here caches them.

pub mod properties;

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};

/// Property key holding the JIRA user name
pub const USERNAME_KEY: &str = "userName";

/// Property key holding the JIRA password or API token
pub const PASSWORD_KEY: &str = "password";

/// Represents credentials for the JIRA server
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

impl fmt::Debug for Credentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credentials")
      .field("username", &self.username)
      .field("password", &"<redacted>")
      .finish()
  }
}

/// Load credentials from a properties file containing `userName` and
/// `password` entries.
///
/// A missing file or a missing key is a configuration error; the message
/// names the offending path or key.
pub fn load_credentials(path: &Path) -> Result<Credentials> {
  tracing::debug!("Loading credentials from {}", path.display());

  let props = properties::read_properties_file(path)
    .with_context(|| format!("Cannot load credentials from {}", path.display()))?;

  let username = props
    .get(USERNAME_KEY)
    .filter(|value| !value.is_empty())
    .with_context(|| format!("Missing '{USERNAME_KEY}' in {}", path.display()))?;
  let password = props
    .get(PASSWORD_KEY)
    .with_context(|| format!("Missing '{PASSWORD_KEY}' in {}", path.display()))?;

  Ok(Credentials {
    username: username.clone(),
    password: password.clone(),
  })
}
