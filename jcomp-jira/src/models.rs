use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Represents JIRA authentication credentials
#[derive(Clone)]
pub struct JiraAuth {
  pub username: String,
  pub api_token: String,
}

/// Default assignee policy of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssigneeType {
  ProjectDefault,
  ComponentLead,
  ProjectLead,
  Unassigned,
}

impl AssigneeType {
  /// Name used by the REST API
  pub const fn as_str(self) -> &'static str {
    match self {
      AssigneeType::ProjectDefault => "PROJECT_DEFAULT",
      AssigneeType::ComponentLead => "COMPONENT_LEAD",
      AssigneeType::ProjectLead => "PROJECT_LEAD",
      AssigneeType::Unassigned => "UNASSIGNED",
    }
  }

  /// Value of the assignee radio buttons and select options in the web UI.
  ///
  /// Only the form backend uses this; the ordering must match the server's.
  pub const fn form_value(self) -> u8 {
    match self {
      AssigneeType::ProjectDefault => 0,
      AssigneeType::ComponentLead => 1,
      AssigneeType::ProjectLead => 2,
      AssigneeType::Unassigned => 3,
    }
  }
}

impl fmt::Display for AssigneeType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Represents a JIRA user reference
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraUser {
  #[serde(default)]
  pub name: String,
  pub display_name: Option<String>,
}

/// A component as listed inside a project
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BasicComponent {
  #[serde(rename = "self")]
  pub self_url: String,
  pub id: String,
  pub name: String,
  pub description: Option<String>,
}

/// Full component detail
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
  #[serde(rename = "self")]
  pub self_url: String,
  pub id: String,
  pub name: String,
  pub description: Option<String>,
  pub lead: Option<JiraUser>,
  pub lead_user_name: Option<String>,
  pub assignee_type: Option<AssigneeType>,
  pub assignee: Option<JiraUser>,
  pub project: Option<String>,
}

impl Component {
  /// User name of the component lead, if any
  pub fn lead_name(&self) -> Option<&str> {
    self
      .lead
      .as_ref()
      .map(|lead| lead.name.as_str())
      .filter(|name| !name.is_empty())
      .or(self.lead_user_name.as_deref())
  }
}

/// Represents a JIRA project
#[derive(Debug, Clone, Deserialize)]
pub struct JiraProject {
  #[serde(rename = "self")]
  pub self_url: String,
  pub id: String,
  pub key: String,
  pub name: String,
  #[serde(default)]
  pub components: Vec<BasicComponent>,
}

/// Body of component create and update requests.
///
/// `None` fields serialize as `null`, which clears the value on update.
/// `project` is only sent on create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInput {
  pub name: String,
  pub description: Option<String>,
  pub lead_user_name: Option<String>,
  pub assignee_type: Option<AssigneeType>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub project: Option<String>,
}

/// Error payload returned by the REST API on 4xx responses
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraErrorResponse {
  #[serde(default)]
  pub error_messages: Vec<String>,
  #[serde(default)]
  pub errors: BTreeMap<String, String>,
}

impl JiraErrorResponse {
  /// Flatten all messages into one line
  pub fn message(&self) -> String {
    self
      .error_messages
      .iter()
      .cloned()
      .chain(self.errors.iter().map(|(field, msg)| format!("{field}: {msg}")))
      .collect::<Vec<_>>()
      .join("; ")
  }
}
