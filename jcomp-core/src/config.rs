//! # Configuration Management
//!
//! Resolves which JIRA instance to talk to, which backend to drive it with,
//! and where the credentials live. Values come from the config file in the
//! XDG config directory, then environment variables, then CLI flags.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::url::{DEFAULT_JIRA_HOST, ENV_JIRA_HOST, normalize_base_url};

/// Environment variable selecting the backend (`rest` or `html`)
pub const ENV_BACKEND: &str = "JCOMP_BACKEND";

/// Environment variable pointing at the credentials properties file
pub const ENV_CREDENTIALS: &str = "JCOMP_CREDENTIALS";

const CONFIG_FILE_NAME: &str = "config.toml";
const CREDENTIALS_FILE_NAME: &str = "credentials.properties";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Which JIRA surface component operations are driven through
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  /// The `/rest/api/2` endpoints
  #[default]
  Rest,
  /// Login and administration web forms
  Html,
}

impl fmt::Display for Backend {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Backend::Rest => write!(f, "rest"),
      Backend::Html => write!(f, "html"),
    }
  }
}

impl FromStr for Backend {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "rest" => Ok(Backend::Rest),
      "html" => Ok(Backend::Html),
      other => Err(anyhow::anyhow!("Unknown backend '{other}', expected 'rest' or 'html'")),
    }
  }
}

/// Settings for component administration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
  /// JIRA base URL
  pub host: String,

  /// Backend used for component operations
  pub backend: Backend,

  /// Path of the credentials properties file; defaults to the config dir
  #[serde(skip_serializing_if = "Option::is_none")]
  pub credentials: Option<PathBuf>,

  /// Per-request timeout handed to the HTTP client
  pub timeout_secs: u64,
}

impl Default for AdminConfig {
  fn default() -> Self {
    Self {
      host: DEFAULT_JIRA_HOST.to_string(),
      backend: Backend::default(),
      credentials: None,
      timeout_secs: DEFAULT_TIMEOUT_SECS,
    }
  }
}

impl AdminConfig {
  /// Apply `JIRA_HOST`, `JCOMP_BACKEND` and `JCOMP_CREDENTIALS` on top of
  /// the file values.
  pub fn with_env_overrides(mut self) -> Result<Self> {
    if let Ok(host) = std::env::var(ENV_JIRA_HOST) {
      tracing::debug!("Using {ENV_JIRA_HOST}={host}");
      self.host = host;
    }
    if let Ok(backend) = std::env::var(ENV_BACKEND) {
      self.backend = backend
        .parse()
        .with_context(|| format!("Invalid {ENV_BACKEND} value"))?;
    }
    if let Ok(path) = std::env::var(ENV_CREDENTIALS) {
      self.credentials = Some(PathBuf::from(path));
    }
    Ok(self)
  }

  /// The normalized JIRA base URL
  pub fn base_url(&self) -> Result<String> {
    normalize_base_url(&self.host)
  }

  /// Credentials file to read, falling back to the config directory
  pub fn credentials_path(&self, dirs: &ConfigDirs) -> PathBuf {
    self
      .credentials
      .clone()
      .unwrap_or_else(|| dirs.default_credentials_path())
  }
}

/// Represents the configuration directories for jcomp
#[derive(Debug, Clone)]
pub struct ConfigDirs {
  pub config_dir: PathBuf,
}

impl ConfigDirs {
  /// Create a new ConfigDirs instance
  pub fn new() -> Result<Self> {
    let proj_dirs =
      ProjectDirs::from("org", "jenkins-ci", "jcomp").context("Failed to determine project directories")?;

    Ok(Self {
      config_dir: proj_dirs.config_dir().to_path_buf(),
    })
  }

  /// Build a ConfigDirs rooted at an explicit directory
  pub fn at(config_dir: impl AsRef<Path>) -> Self {
    Self {
      config_dir: config_dir.as_ref().to_path_buf(),
    }
  }

  /// Get the config directory
  pub fn config_dir(&self) -> &PathBuf {
    &self.config_dir
  }

  /// Get the path to the configuration file
  pub fn config_path(&self) -> PathBuf {
    self.config_dir.join(CONFIG_FILE_NAME)
  }

  /// Get the default location of the credentials file
  pub fn default_credentials_path(&self) -> PathBuf {
    self.config_dir.join(CREDENTIALS_FILE_NAME)
  }

  /// Load the configuration file or return defaults if it does not exist
  pub fn load_config(&self) -> Result<AdminConfig> {
    let config_path = self.config_path();

    if !config_path.exists() {
      tracing::debug!("No config at {}, using defaults", config_path.display());
      return Ok(AdminConfig::default());
    }

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

    toml::from_str(&content).with_context(|| format!("Failed to parse config from {}", config_path.display()))
  }

  /// Save the configuration file
  pub fn save_config(&self, config: &AdminConfig) -> Result<()> {
    let config_path = self.config_path();

    fs::create_dir_all(&self.config_dir)
      .with_context(|| format!("Failed to create config directory {}", self.config_dir.display()))?;

    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(&config_path, content).with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    Ok(())
  }
}

/// Get the configuration directories
pub fn get_config_dirs() -> Result<ConfigDirs> {
  ConfigDirs::new()
}
