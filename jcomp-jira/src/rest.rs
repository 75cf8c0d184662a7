//! Component administration through the REST API.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::admin::ComponentAdmin;
use crate::client::JiraClient;
use crate::error::{ComponentError, component_error};
use crate::models::{AssigneeType, BasicComponent, ComponentInput};

/// [`ComponentAdmin`] backed by the `/rest/api/2` component endpoints
pub struct RestComponentAdmin {
  client: JiraClient,
}

impl RestComponentAdmin {
  pub fn new(client: JiraClient) -> Self {
    Self { client }
  }

  /// Get the underlying REST client
  pub fn client(&self) -> &JiraClient {
    &self.client
  }

  /// Find a component of `project` by exact name.
  ///
  /// Fails with [`ComponentError::NotFound`] if no component matches.
  pub async fn find_component(&self, project: &str, name: &str) -> Result<BasicComponent> {
    let project_data = self.client.get_project(project).await?;

    project_data
      .components
      .into_iter()
      .find(|c| c.name == name)
      .ok_or_else(|| ComponentError::not_found(project, name).into())
  }

  async fn is_name_available(&self, project: &str, name: &str) -> Result<bool> {
    match self.find_component(project, name).await {
      Ok(_) => Ok(false),
      Err(err) if matches!(component_error(&err), Some(ComponentError::NotFound { .. })) => Ok(true),
      Err(err) => Err(err),
    }
  }
}

impl ComponentAdmin for RestComponentAdmin {
  async fn check_connection(&self) -> Result<()> {
    if self.client.test_connection().await? {
      Ok(())
    } else {
      Err(anyhow::anyhow!(
        "Authentication failed. Please check your JIRA credentials."
      ))
    }
  }

  async fn create_component(
    &self,
    project: &str,
    name: &str,
    owner: Option<&str>,
    assignee: Option<AssigneeType>,
  ) -> Result<()> {
    if !self.is_name_available(project, name).await? {
      return Err(
        ComponentError::AlreadyExists {
          project: project.to_string(),
          name: name.to_string(),
        }
        .into(),
      );
    }

    let input = ComponentInput {
      name: name.to_string(),
      description: Some(format!("{name} plugin")),
      lead_user_name: owner.map(str::to_string),
      assignee_type: assignee,
      project: Some(project.to_string()),
    };
    let created = self.client.create_component(&input).await?;

    info!("Created component {} ({}) in {project}", created.name, created.id);
    Ok(())
  }

  async fn rename_component(&self, project: &str, old_name: &str, new_name: &str) -> Result<()> {
    let component = self.find_component(project, old_name).await?;

    if !self.is_name_available(project, new_name).await? {
      return Err(
        ComponentError::Conflict {
          project: project.to_string(),
          from: old_name.to_string(),
          to: new_name.to_string(),
        }
        .into(),
      );
    }

    let detail = self
      .client
      .get_component(&component.id)
      .await
      .with_context(|| format!("Failed to read component {old_name}"))?;

    let input = ComponentInput {
      name: new_name.to_string(),
      description: component.description.clone(),
      lead_user_name: detail.lead_name().map(str::to_string),
      assignee_type: detail.assignee_type,
      project: None,
    };
    self.client.update_component(&component.id, &input).await?;

    info!("Renamed component {old_name} to {new_name} in {project}");
    Ok(())
  }

  async fn delete_component(&self, project: &str, name: &str, backup: &str) -> Result<()> {
    let deleted = self.find_component(project, name).await?;
    let backup_component = self.find_component(project, backup).await?;

    self
      .client
      .remove_component(&deleted.id, Some(&backup_component.id))
      .await?;

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
    let basic = self.find_component(project, component).await?;

    let lead_user_name = match lead {
      Some(name) => Some(name.to_string()),
      None => {
        let detail = self.client.get_component(&basic.id).await?;
        detail.lead_name().map(str::to_string)
      }
    };
    debug!("Resolved lead of {component}: {lead_user_name:?}");

    let input = ComponentInput {
      name: component.to_string(),
      description: basic.description.clone(),
      lead_user_name,
      assignee_type: Some(assignee),
      project: None,
    };
    self.client.update_component(&basic.id, &input).await?;

    info!("Set default assignee of {component} in {project} to {assignee}");
    Ok(())
  }

  async fn remove_default_assignee(&self, project: &str, component: &str, assignee: AssigneeType) -> Result<()> {
    let basic = self.find_component(project, component).await?;

    let input = ComponentInput {
      name: component.to_string(),
      description: basic.description.clone(),
      lead_user_name: None,
      assignee_type: Some(assignee),
      project: None,
    };
    self.client.update_component(&basic.id, &input).await?;

    info!("Removed default assignee of {component} in {project}");
    Ok(())
  }
}
