//! Authenticated browsing of the JIRA web UI.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use jcomp_core::Credentials;
use reqwest::{Client, Method, Response};
use tracing::debug;
use url::Url;

use crate::consts::{LOGIN_PATH, LOGIN_REASON_HEADER, USER_AGENT};
use crate::error::ComponentError;
use crate::html::page::{Form, HtmlPage, check_for_errors};

/// A logged-in web session. Cookies from the login are kept for the
/// lifetime of the value.
pub struct HtmlSession {
  client: Client,
  base_url: String,
}

impl HtmlSession {
  /// Log in through the login form.
  ///
  /// Fails with [`ComponentError::RemoteValidation`] if JIRA rejects the
  /// credentials.
  pub async fn login(base_url: &str, credentials: &Credentials, timeout: Duration) -> Result<Self> {
    let client = Client::builder()
      .user_agent(USER_AGENT)
      .cookie_store(true)
      .timeout(timeout)
      .build()
      .context("Failed to build HTTP client")?;
    let session = Self {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
    };

    let url = session.url(LOGIN_PATH)?;
    debug!("Logging in to {} as {}", url, credentials.username);

    let response = session
      .client
      .post(url)
      .form(&[
        ("os_username", credentials.username.as_str()),
        ("os_password", credentials.password.as_str()),
        ("os_cookie", "true"),
        ("login", "Log In"),
      ])
      .send()
      .await
      .context("Failed to submit JIRA login form")?;

    if let Some(reason) = response
      .headers()
      .get(LOGIN_REASON_HEADER)
      .and_then(|value| value.to_str().ok())
      && (reason.contains("AUTHENTICATION_DENIED") || reason.contains("AUTHENTICATED_FAILED"))
    {
      return Err(ComponentError::RemoteValidation(format!("Login rejected by JIRA: {reason}")).into());
    }

    read_page(response).await?;
    Ok(session)
  }

  fn url(&self, path_and_query: &str) -> Result<Url> {
    let url = format!("{}{}", self.base_url, path_and_query);
    Url::parse(&url).with_context(|| format!("Invalid JIRA URL '{url}'"))
  }

  /// Fetch a page relative to the base URL
  pub async fn get(&self, path_and_query: &str) -> Result<HtmlPage> {
    let url = self.url(path_and_query)?;
    debug!("Fetching {url}");

    let response = self
      .client
      .get(url.clone())
      .send()
      .await
      .with_context(|| format!("Failed to fetch {url}"))?;

    let status = response.status();
    let final_url = response.url().clone();
    let body = response.text().await.context("Failed to read JIRA page")?;
    if !status.is_success() {
      bail!("Unexpected error: HTTP {status} for {final_url}");
    }

    Ok(HtmlPage::new(final_url, body))
  }

  /// Submit a form and validate the resulting page
  pub async fn submit(&self, form: &Form) -> Result<HtmlPage> {
    debug!("Submitting {} {}", form.method(), form.action());

    let fields = form.submission();
    let request = if *form.method() == Method::GET {
      self.client.get(form.action().clone()).query(&fields)
    } else {
      self.client.post(form.action().clone()).form(&fields)
    };

    let response = request
      .send()
      .await
      .with_context(|| format!("Failed to submit form to {}", form.action()))?;

    read_page(response).await
  }
}

async fn read_page(response: Response) -> Result<HtmlPage> {
  let status = response.status();
  let url = response.url().clone();
  let body = response.text().await.context("Failed to read JIRA page")?;

  let page = check_for_errors(HtmlPage::new(url, body))?;
  if !status.is_success() {
    bail!("Unexpected error: HTTP {} for {}", status, page.url());
  }

  Ok(page)
}
