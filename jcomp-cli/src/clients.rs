//! # Client Creation
//!
//! Resolves configuration (file, environment, then flags) and builds the
//! component administration backend together with a runtime to drive it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use jcomp_core::{AdminConfig, Backend, ConfigDirs, get_config_dirs};
use jcomp_jira::{ComponentAdminBackend, create_component_admin, load_configured_credentials};
use tokio::runtime::Runtime;
use tracing::debug;

/// Connection settings given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConnectionOverrides {
  pub host: Option<String>,
  pub backend: Option<Backend>,
  pub credentials: Option<PathBuf>,
}

impl ConnectionOverrides {
  fn apply(&self, mut config: AdminConfig) -> AdminConfig {
    if let Some(host) = &self.host {
      config.host = host.clone();
    }
    if let Some(backend) = self.backend {
      config.backend = backend;
    }
    if let Some(credentials) = &self.credentials {
      config.credentials = Some(credentials.clone());
    }
    config
  }
}

/// The configuration in effect: config file, then environment, then flags
pub fn resolve_config(dirs: &ConfigDirs, overrides: &ConnectionOverrides) -> Result<AdminConfig> {
  let config = dirs.load_config()?.with_env_overrides()?;
  let config = overrides.apply(config);
  debug!("Resolved configuration: {:?}", config);
  Ok(config)
}

/// Creates a tokio runtime and the configured component administration
/// backend.
pub fn create_admin_runtime(overrides: &ConnectionOverrides) -> Result<(Runtime, ComponentAdminBackend)> {
  let dirs = get_config_dirs()?;
  let config = resolve_config(&dirs, overrides)?;
  let credentials = load_configured_credentials(&config, &dirs)?;

  let rt = Runtime::new().context("Failed to create async runtime")?;
  let admin = create_component_admin(&config, credentials).context("Failed to create JIRA client")?;
  Ok((rt, admin))
}
