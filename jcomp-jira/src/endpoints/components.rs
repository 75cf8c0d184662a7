//! # JIRA Component Endpoints
//!
//! Read, create, update, and remove operations on the component resource.

use anyhow::{Context, Result};
use reqwest::StatusCode;
use tracing::debug;

use crate::client::{JiraClient, status_error};
use crate::models::{Component, ComponentInput};

fn component_not_found(component_id: &str) -> anyhow::Error {
  anyhow::anyhow!("Component {} not found", component_id)
}

impl JiraClient {
  /// Get the full detail of a component
  pub async fn get_component(&self, component_id: &str) -> Result<Component> {
    let url = self.api_url(&format!("component/{component_id}"));

    let response = self
      .client
      .get(&url)
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
      .send()
      .await
      .context("Failed to fetch JIRA component")?;

    match response.status() {
      StatusCode::OK => response
        .json::<Component>()
        .await
        .context("Failed to parse JIRA component"),
      _ => Err(status_error(response, || component_not_found(component_id)).await),
    }
  }

  /// Create a component. `input.project` must carry the project key.
  pub async fn create_component(&self, input: &ComponentInput) -> Result<Component> {
    let url = self.api_url("component");
    debug!("Creating component {} in {:?}", input.name, input.project);

    let response = self
      .client
      .post(&url)
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
      .json(input)
      .send()
      .await
      .context("Failed to create JIRA component")?;

    match response.status() {
      StatusCode::CREATED | StatusCode::OK => response
        .json::<Component>()
        .await
        .context("Failed to parse created JIRA component"),
      _ => {
        let project = input.project.clone().unwrap_or_default();
        Err(status_error(response, || anyhow::anyhow!("Project {} not found", project)).await)
      }
    }
  }

  /// Update a component with the given values
  pub async fn update_component(&self, component_id: &str, input: &ComponentInput) -> Result<Component> {
    let url = self.api_url(&format!("component/{component_id}"));
    debug!("Updating component {component_id}: {input:?}");

    let response = self
      .client
      .put(&url)
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
      .json(input)
      .send()
      .await
      .context("Failed to update JIRA component")?;

    match response.status() {
      StatusCode::OK => response
        .json::<Component>()
        .await
        .context("Failed to parse updated JIRA component"),
      _ => Err(status_error(response, || component_not_found(component_id)).await),
    }
  }

  /// Remove a component, moving its issues to `move_issues_to` if given
  pub async fn remove_component(&self, component_id: &str, move_issues_to: Option<&str>) -> Result<()> {
    let url = self.api_url(&format!("component/{component_id}"));
    debug!("Removing component {component_id}, moving issues to {move_issues_to:?}");

    let mut request = self
      .client
      .delete(&url)
      .basic_auth(&self.auth.username, Some(&self.auth.api_token));
    if let Some(target) = move_issues_to {
      request = request.query(&[("moveIssuesTo", target)]);
    }

    let response = request.send().await.context("Failed to remove JIRA component")?;

    match response.status() {
      StatusCode::NO_CONTENT | StatusCode::OK => Ok(()),
      _ => Err(status_error(response, || component_not_found(component_id)).await),
    }
  }
}
