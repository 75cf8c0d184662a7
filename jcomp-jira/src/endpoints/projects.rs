//! # JIRA Project Endpoints

use anyhow::{Context, Result};
use reqwest::StatusCode;
use tracing::debug;

use crate::client::{JiraClient, status_error};
use crate::error::ComponentError;
use crate::models::JiraProject;

impl JiraClient {
  /// Get a project, including its component list, by key
  pub async fn get_project(&self, project_key: &str) -> Result<JiraProject> {
    let url = self.api_url(&format!("project/{project_key}"));
    debug!("Fetching project {project_key}");

    let response = self
      .client
      .get(&url)
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
      .send()
      .await
      .context("Failed to fetch JIRA project")?;

    match response.status() {
      StatusCode::OK => response
        .json::<JiraProject>()
        .await
        .context("Failed to parse JIRA project"),
      _ => Err(status_error(response, || ComponentError::ProjectNotFound(project_key.to_string()).into()).await),
    }
  }
}
