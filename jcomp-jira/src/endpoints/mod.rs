//! # JIRA API Endpoints
//!
//! REST endpoint implementations for the project and component resources.

pub mod components;
pub mod projects;
