//! Failures of component operations that callers may want to act on.
//!
//! Transport and parsing failures are not listed here; they travel as the
//! underlying `reqwest`/`serde_json` error inside an [`anyhow::Error`].

use thiserror::Error;

/// Errors that can occur while administering components
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComponentError {
  #[error("Unable to find component {name} in the {project} issue tracker")]
  NotFound { project: String, name: String },

  #[error("Unable to rename component {from} in {project}. Component {to} already exists")]
  Conflict { project: String, from: String, to: String },

  #[error("Unable to create component {name} in {project}. It already exists")]
  AlreadyExists { project: String, name: String },

  #[error("Project {0} not found")]
  ProjectNotFound(String),

  #[error("JIRA rejected the request: {0}")]
  RemoteValidation(String),
}

impl ComponentError {
  pub(crate) fn not_found(project: &str, name: &str) -> Self {
    Self::NotFound {
      project: project.to_string(),
      name: name.to_string(),
    }
  }
}

/// Get the [`ComponentError`] carried by an error, looking through context.
pub fn component_error(err: &anyhow::Error) -> Option<&ComponentError> {
  err.downcast_ref::<ComponentError>()
}
