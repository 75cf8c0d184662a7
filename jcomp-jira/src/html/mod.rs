//! # Form-driven Component Administration
//!
//! Drives the JIRA administration pages the way a browser would: log in,
//! load the page holding the relevant form, fill in fields, submit, and
//! check the response for JIRA's error marker. This depends on the page
//! markup of the server and exists for instances whose REST API lacks the
//! component operations; prefer [`crate::RestComponentAdmin`].

mod page;
mod session;

use std::time::Duration;

use anyhow::{Context, Result};
use jcomp_core::Credentials;
pub use page::{Form, HtmlPage, RadioRow, check_for_errors, visible_text};
pub use session::HtmlSession;
use tracing::{debug, info};

use crate::admin::ComponentAdmin;
use crate::consts::{
  ADD_COMPONENT_PATH, BROWSE_PROJECT_PATH, DELETE_COMPONENT_PATH, EDIT_COMPONENT_PATH, SELECT_ASSIGNEES_PATH,
};
use crate::error::ComponentError;
use crate::models::AssigneeType;

/// Prefix of the assignee radio controls; the rest is the component id
const COMPONENT_CONTROL_PREFIX: &str = "component_";

const LEAD_FIELD: &str = "componentLead";
const ASSIGNEE_TYPE_FIELD: &str = "assigneeType";

/// A component as listed on the component assignees page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRow {
  pub id: String,
  pub name: String,
  /// Name of the radio control holding the assignee policy
  pub control: String,
}

/// [`ComponentAdmin`] backed by the JIRA web UI
pub struct HtmlComponentAdmin {
  base_url: String,
  credentials: Credentials,
  timeout: Duration,
}

impl HtmlComponentAdmin {
  pub fn new(base_url: &str, credentials: Credentials, timeout: Duration) -> Self {
    Self {
      base_url: base_url.trim_end_matches('/').to_string(),
      credentials,
      timeout,
    }
  }

  async fn login(&self) -> Result<HtmlSession> {
    HtmlSession::login(&self.base_url, &self.credentials, self.timeout).await
  }

  /// Find a component of `project` by exact name.
  ///
  /// Fails with [`ComponentError::NotFound`] if no component matches.
  pub async fn find_component(&self, project: &str, name: &str) -> Result<ComponentRow> {
    let session = self.login().await?;
    let (_, rows) = self.component_rows(&session, project).await?;
    find_row(&rows, project, name).cloned()
  }

  async fn project_id(&self, session: &HtmlSession, project: &str) -> Result<String> {
    let page = session
      .get(&format!("{BROWSE_PROJECT_PATH}/{project}"))
      .await
      .with_context(|| format!("Failed to open project {project}"))?;

    let pid = match page.attribute(r#"meta[name="ajs-pid"]"#, "content")? {
      Some(pid) => Some(pid),
      None => page.attribute(r#"input[name="pid"]"#, "value")?,
    };
    let pid = pid.ok_or_else(|| ComponentError::ProjectNotFound(project.to_string()))?;

    debug!("Project {project} has id {pid}");
    Ok(pid)
  }

  async fn assignees_page(&self, session: &HtmlSession, pid: &str) -> Result<HtmlPage> {
    session.get(&format!("{SELECT_ASSIGNEES_PATH}?projectId={pid}")).await
  }

  /// Load the assignees page of `project` and the components listed on it
  async fn component_rows(&self, session: &HtmlSession, project: &str) -> Result<(String, Vec<ComponentRow>)> {
    let pid = self.project_id(session, project).await?;
    let page = self.assignees_page(session, &pid).await?;
    Ok((pid, parse_component_rows(&page)))
  }

  /// The assignees form with the row's policy control set to `assignee`
  async fn assignee_form(
    &self,
    session: &HtmlSession,
    pid: &str,
    row: &ComponentRow,
    assignee: AssigneeType,
  ) -> Result<Form> {
    let page = self.assignees_page(session, pid).await?;
    let mut form = page.form_with_field(&row.control)?;
    form.set(&row.control, assignee.form_value().to_string());
    Ok(form)
  }

  /// Change lead and assignee policy together.
  ///
  /// The edit form carries both on current JIRA versions, making this a
  /// single submission. Older edit forms lack the policy; then both forms
  /// are loaded and filled before either is submitted.
  async fn update_lead_and_assignee(
    &self,
    session: &HtmlSession,
    pid: &str,
    row: &ComponentRow,
    lead: &str,
    assignee: AssigneeType,
  ) -> Result<()> {
    let page = session
      .get(&format!("{EDIT_COMPONENT_PATH}?id={}", row.id))
      .await?;
    let mut edit_form = page.form_with_field(LEAD_FIELD)?;
    edit_form.set(LEAD_FIELD, lead);

    if edit_form.has_control(ASSIGNEE_TYPE_FIELD) {
      edit_form.set(ASSIGNEE_TYPE_FIELD, assignee.form_value().to_string());
      session.submit(&edit_form).await?;
      return Ok(());
    }

    debug!("Edit form of {} has no {ASSIGNEE_TYPE_FIELD} control", row.name);
    let assignee_form = self.assignee_form(session, pid, row, assignee).await?;
    session.submit(&edit_form).await?;
    session.submit(&assignee_form).await?;
    Ok(())
  }
}

/// Components on an assignees page, one per row with an assignee control
pub fn parse_component_rows(page: &HtmlPage) -> Vec<ComponentRow> {
  page
    .radio_rows()
    .into_iter()
    .filter_map(|row| {
      let id = row.control.strip_prefix(COMPONENT_CONTROL_PREFIX)?.to_string();
      Some(ComponentRow {
        id,
        name: row.label,
        control: row.control,
      })
    })
    .collect()
}

fn find_row<'a>(rows: &'a [ComponentRow], project: &str, name: &str) -> Result<&'a ComponentRow> {
  rows
    .iter()
    .find(|row| row.name == name)
    .ok_or_else(|| ComponentError::not_found(project, name).into())
}

impl ComponentAdmin for HtmlComponentAdmin {
  async fn check_connection(&self) -> Result<()> {
    self.login().await.map(|_| ())
  }

  async fn create_component(
    &self,
    project: &str,
    name: &str,
    owner: Option<&str>,
    assignee: Option<AssigneeType>,
  ) -> Result<()> {
    let session = self.login().await?;
    let (pid, rows) = self.component_rows(&session, project).await?;
    if rows.iter().any(|row| row.name == name) {
      return Err(
        ComponentError::AlreadyExists {
          project: project.to_string(),
          name: name.to_string(),
        }
        .into(),
      );
    }

    let page = session.get(&format!("{ADD_COMPONENT_PATH}?pid={pid}")).await?;
    let mut form = page.form_with_field("name")?;
    form.set("name", name);
    form.set("description", format!("{name} plugin"));
    if let Some(owner) = owner {
      form.set(LEAD_FIELD, owner);
    }
    if let Some(assignee) = assignee {
      form.set(ASSIGNEE_TYPE_FIELD, assignee.form_value().to_string());
    }
    session.submit(&form).await?;

    info!("Created component {name} in {project}");
    Ok(())
  }

  async fn rename_component(&self, project: &str, old_name: &str, new_name: &str) -> Result<()> {
    let session = self.login().await?;
    let (_, rows) = self.component_rows(&session, project).await?;
    let row = find_row(&rows, project, old_name)?;
    if rows.iter().any(|r| r.name == new_name) {
      return Err(
        ComponentError::Conflict {
          project: project.to_string(),
          from: old_name.to_string(),
          to: new_name.to_string(),
        }
        .into(),
      );
    }

    // The edit form comes back pre-filled with lead, description and policy
    let page = session.get(&format!("{EDIT_COMPONENT_PATH}?id={}", row.id)).await?;
    let mut form = page.form_with_field("name")?;
    form.set("name", new_name);
    session.submit(&form).await?;

    info!("Renamed component {old_name} to {new_name} in {project}");
    Ok(())
  }

  async fn delete_component(&self, project: &str, name: &str, backup: &str) -> Result<()> {
    let session = self.login().await?;
    let (_, rows) = self.component_rows(&session, project).await?;
    let deleted = find_row(&rows, project, name)?;
    let backup_row = find_row(&rows, project, backup)?;

    let page = session
      .get(&format!("{DELETE_COMPONENT_PATH}?id={}", deleted.id))
      .await?;
    let mut form = page.form_with_field("moveIssuesTo")?;
    if form.has_control("action") {
      form.set("action", "swap");
    }
    form.set("moveIssuesTo", backup_row.id.as_str());
    session.submit(&form).await?;

    info!("Deleted component {name} from {project}, issues moved to {backup}");
    Ok(())
  }

  async fn set_default_assignee(
    &self,
    project: &str,
    component: &str,
    assignee: AssigneeType,
    lead: Option<&str>,
  ) -> Result<()> {
    let session = self.login().await?;
    let (pid, rows) = self.component_rows(&session, project).await?;
    let row = find_row(&rows, project, component)?;

    match lead {
      Some(lead) => {
        self
          .update_lead_and_assignee(&session, &pid, row, lead, assignee)
          .await?
      }
      None => {
        let form = self.assignee_form(&session, &pid, row, assignee).await?;
        session.submit(&form).await?;
      }
    }

    info!("Set default assignee of {component} in {project} to {assignee}");
    Ok(())
  }

  async fn remove_default_assignee(&self, project: &str, component: &str, assignee: AssigneeType) -> Result<()> {
    let session = self.login().await?;
    let (pid, rows) = self.component_rows(&session, project).await?;
    let row = find_row(&rows, project, component)?;

    self
      .update_lead_and_assignee(&session, &pid, row, "", assignee)
      .await?;

    info!("Removed default assignee of {component} in {project}");
    Ok(())
  }
}
