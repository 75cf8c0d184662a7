//! Session factory: turns configuration and credentials into a backend.
//!
//! Credentials are always passed in explicitly; nothing here reads global
//! state other than the files and variables named by the configuration.

use std::time::Duration;

use anyhow::{Context, Result};
use jcomp_core::creds::load_credentials;
use jcomp_core::{AdminConfig, Backend, ConfigDirs, Credentials};
use tracing::debug;

use crate::admin::ComponentAdminBackend;
use crate::client::{JiraClient, create_jira_client};
use crate::html::HtmlComponentAdmin;
use crate::rest::RestComponentAdmin;

/// Load the credentials file the configuration points at.
pub fn load_configured_credentials(config: &AdminConfig, dirs: &ConfigDirs) -> Result<Credentials> {
  let path = config.credentials_path(dirs);
  load_credentials(&path).context("Failed to get JIRA credentials")
}

/// Creates an authenticated REST client for the configured host.
pub fn create_jira_client_from_config(config: &AdminConfig, credentials: &Credentials) -> Result<JiraClient> {
  let base_url = config.base_url()?;
  create_jira_client(
    &base_url,
    &credentials.username,
    &credentials.password,
    Duration::from_secs(config.timeout_secs),
  )
}

/// Creates the component administration backend selected by `config`.
pub fn create_component_admin(config: &AdminConfig, credentials: Credentials) -> Result<ComponentAdminBackend> {
  debug!("Using the {} backend against {}", config.backend, config.host);

  match config.backend {
    Backend::Rest => {
      let client = create_jira_client_from_config(config, &credentials)?;
      Ok(ComponentAdminBackend::Rest(RestComponentAdmin::new(client)))
    }
    Backend::Html => {
      let base_url = config.base_url()?;
      Ok(ComponentAdminBackend::Html(HtmlComponentAdmin::new(
        &base_url,
        credentials,
        Duration::from_secs(config.timeout_secs),
      )))
    }
  }
}
