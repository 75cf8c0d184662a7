//! Host normalization for the JIRA base URL.

use anyhow::{Result, bail};
use url::Url;

/// Environment variable overriding the configured JIRA host.
pub const ENV_JIRA_HOST: &str = "JIRA_HOST";

/// The JIRA instance the tool was originally written against.
pub const DEFAULT_JIRA_HOST: &str = "https://issues.jenkins-ci.org";

/// Normalize a JIRA host into a base URL usable for joining request paths.
///
/// A missing scheme defaults to https://. Trailing slashes, queries, and
/// fragments are dropped; a context path (e.g. `/jira`) is kept.
pub fn normalize_base_url(input: &str) -> Result<String> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    bail!("Host cannot be empty");
  }

  let candidate = if trimmed.contains("://") {
    trimmed.to_string()
  } else {
    format!("https://{trimmed}")
  };

  let url = Url::parse(&candidate).map_err(|e| anyhow::anyhow!("Failed to parse host '{input}': {e}"))?;
  if !matches!(url.scheme(), "http" | "https") {
    bail!("Unsupported scheme '{}' in host '{input}'", url.scheme());
  }
  if url.host_str().is_none() {
    bail!("Host '{input}' has no hostname");
  }

  let mut base = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());
  if let Some(port) = url.port() {
    base.push_str(&format!(":{port}"));
  }
  base.push_str(url.path().trim_end_matches('/'));

  Ok(base)
}

#[cfg(test)]
mod tests {
  use test_case::test_case;

  use super::*;

  #[test_case("https://issues.jenkins-ci.org", "https://issues.jenkins-ci.org" ; "already normalized")]
  #[test_case("issues.jenkins-ci.org", "https://issues.jenkins-ci.org" ; "missing scheme")]
  #[test_case("https://issues.jenkins-ci.org/", "https://issues.jenkins-ci.org" ; "trailing slash")]
  #[test_case("http://localhost:8080", "http://localhost:8080" ; "http with port")]
  #[test_case("localhost:2990/jira/", "https://localhost:2990/jira" ; "context path")]
  #[test_case("  https://jira.example.com?x=1#top ", "https://jira.example.com" ; "query and fragment")]
  fn test_normalize_base_url(input: &str, expected: &str) {
    assert_eq!(normalize_base_url(input).unwrap(), expected);
  }

  #[test]
  fn test_normalize_base_url_empty() {
    let error = normalize_base_url("   ").unwrap_err().to_string();
    assert!(error.contains("Host cannot be empty"));
  }

  #[test]
  fn test_normalize_base_url_rejects_other_schemes() {
    let error = normalize_base_url("ftp://jira.example.com").unwrap_err().to_string();
    assert!(error.contains("Unsupported scheme"));
  }
}
