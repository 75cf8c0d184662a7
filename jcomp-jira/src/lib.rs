//! # JIRA Component Administration
//!
//! Create, rename, delete, and configure default assignees of JIRA project
//! components. Two backends implement the same [`ComponentAdmin`]
//! capability: the REST API client, and a form-driven client for JIRA
//! versions whose API lacks the needed operations.

mod admin;
mod auth;
mod client;
mod consts;
mod endpoints;
mod error;
pub mod html;
pub mod models;
mod rest;

pub use admin::{ComponentAdmin, ComponentAdminBackend};
pub use auth::{create_component_admin, create_jira_client_from_config, load_configured_credentials};
pub use client::{JiraClient, create_jira_client};
pub use error::{ComponentError, component_error};
pub use html::HtmlComponentAdmin;
// Re-export models
pub use models::{AssigneeType, BasicComponent, Component, ComponentInput, JiraAuth, JiraProject, JiraUser};
pub use rest::RestComponentAdmin;
