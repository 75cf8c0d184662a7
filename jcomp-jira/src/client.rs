use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Response, StatusCode};

use crate::consts::{REST_API_PATH, USER_AGENT};
use crate::error::ComponentError;
use crate::models::{JiraAuth, JiraErrorResponse};

/// Represents a JIRA REST API client
pub struct JiraClient {
  pub(crate) client: Client,
  pub(crate) base_url: String,
  pub(crate) auth: JiraAuth,
}

impl JiraClient {
  /// Create a new JIRA client
  pub fn new(base_url: &str, auth: JiraAuth) -> Self {
    Self::with_http_client(base_url, auth, Client::new())
  }

  /// Create a JIRA client on top of a preconfigured HTTP client
  pub fn with_http_client(base_url: &str, auth: JiraAuth, client: Client) -> Self {
    Self {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
      auth,
    }
  }

  /// Get the base URL requests are sent to
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  pub(crate) fn api_url(&self, resource: &str) -> String {
    format!("{}{}/{}", self.base_url, REST_API_PATH, resource)
  }

  /// Test the JIRA connection by fetching the current user
  pub async fn test_connection(&self) -> Result<bool> {
    let url = self.api_url("myself");

    let response = self
      .client
      .get(&url)
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
      .send()
      .await
      .context("Failed to connect to JIRA")?;

    Ok(response.status().is_success())
  }
}

/// Turn a non-success response into an error.
///
/// `not_found` describes the resource for 404 responses; 400 responses
/// become [`ComponentError::RemoteValidation`] with JIRA's messages.
pub(crate) async fn status_error(response: Response, not_found: impl FnOnce() -> anyhow::Error) -> anyhow::Error {
  let status = response.status();
  match status {
    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
      anyhow::anyhow!("Authentication failed. Please check your JIRA credentials.")
    }
    StatusCode::NOT_FOUND => not_found(),
    StatusCode::BAD_REQUEST => {
      let body = response.text().await.unwrap_or_default();
      let message = serde_json::from_str::<JiraErrorResponse>(&body)
        .map(|e| e.message())
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"));
      ComponentError::RemoteValidation(message).into()
    }
    _ => anyhow::anyhow!(
      "Unexpected error: HTTP {} - {}",
      status,
      response.text().await.unwrap_or_default()
    ),
  }
}

/// Create a JIRA client from credentials
pub fn create_jira_client(base_url: &str, username: &str, api_token: &str, timeout: Duration) -> Result<JiraClient> {
  let auth = JiraAuth {
    username: username.to_string(),
    api_token: api_token.to_string(),
  };

  let client = Client::builder()
    .user_agent(USER_AGENT)
    .timeout(timeout)
    .build()
    .context("Failed to build HTTP client")?;

  Ok(JiraClient::with_http_client(base_url, auth, client))
}
