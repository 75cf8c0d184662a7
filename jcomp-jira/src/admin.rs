//! The component administration capability and backend selection.

use anyhow::Result;

use crate::html::HtmlComponentAdmin;
use crate::models::AssigneeType;
use crate::rest::RestComponentAdmin;

/// Administrative operations on the components of a JIRA project.
///
/// Every call authenticates on its own and runs its requests one after the
/// other. All lookups and form loads happen before the first mutating
/// request, so a failed lookup or precondition leaves the server untouched.
#[allow(async_fn_in_trait)]
pub trait ComponentAdmin {
  /// Verify that the configured credentials are accepted
  async fn check_connection(&self) -> Result<()>;

  /// Create `name` in `project` with the description `"<name> plugin"`.
  ///
  /// Fails with [`crate::ComponentError::AlreadyExists`] if the name is taken.
  async fn create_component(
    &self,
    project: &str,
    name: &str,
    owner: Option<&str>,
    assignee: Option<AssigneeType>,
  ) -> Result<()>;

  /// Rename a component, keeping its description, lead, and assignee policy.
  async fn rename_component(&self, project: &str, old_name: &str, new_name: &str) -> Result<()>;

  /// Delete a component, moving its issues to `backup`.
  async fn delete_component(&self, project: &str, name: &str, backup: &str) -> Result<()>;

  /// Set the default assignee policy. Without `lead`, the current lead is kept.
  async fn set_default_assignee(
    &self,
    project: &str,
    component: &str,
    assignee: AssigneeType,
    lead: Option<&str>,
  ) -> Result<()>;

  /// Set the default assignee policy and clear the component lead.
  async fn remove_default_assignee(&self, project: &str, component: &str, assignee: AssigneeType) -> Result<()>;
}

/// The backend chosen by configuration
pub enum ComponentAdminBackend {
  Rest(RestComponentAdmin),
  Html(HtmlComponentAdmin),
}

impl ComponentAdmin for ComponentAdminBackend {
  async fn check_connection(&self) -> Result<()> {
    match self {
      Self::Rest(admin) => admin.check_connection().await,
      Self::Html(admin) => admin.check_connection().await,
    }
  }

  async fn create_component(
    &self,
    project: &str,
    name: &str,
    owner: Option<&str>,
    assignee: Option<AssigneeType>,
  ) -> Result<()> {
    match self {
      Self::Rest(admin) => admin.create_component(project, name, owner, assignee).await,
      Self::Html(admin) => admin.create_component(project, name, owner, assignee).await,
    }
  }

  async fn rename_component(&self, project: &str, old_name: &str, new_name: &str) -> Result<()> {
    match self {
      Self::Rest(admin) => admin.rename_component(project, old_name, new_name).await,
      Self::Html(admin) => admin.rename_component(project, old_name, new_name).await,
    }
  }

  async fn delete_component(&self, project: &str, name: &str, backup: &str) -> Result<()> {
    match self {
      Self::Rest(admin) => admin.delete_component(project, name, backup).await,
      Self::Html(admin) => admin.delete_component(project, name, backup).await,
    }
  }

  async fn set_default_assignee(
    &self,
    project: &str,
    component: &str,
    assignee: AssigneeType,
    lead: Option<&str>,
  ) -> Result<()> {
    match self {
      Self::Rest(admin) => admin.set_default_assignee(project, component, assignee, lead).await,
      Self::Html(admin) => admin.set_default_assignee(project, component, assignee, lead).await,
    }
  }

  async fn remove_default_assignee(&self, project: &str, component: &str, assignee: AssigneeType) -> Result<()> {
    match self {
      Self::Rest(admin) => admin.remove_default_assignee(project, component, assignee).await,
      Self::Html(admin) => admin.remove_default_assignee(project, component, assignee).await,
    }
  }
}
