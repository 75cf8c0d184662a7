//! Constants for the jcomp-jira client.

/// User-Agent header value for both backends
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Prefix of the REST resources used here
pub const REST_API_PATH: &str = "/rest/api/2";

// Web UI pages driven by the form backend
pub const LOGIN_PATH: &str = "/login.jsp";
pub const BROWSE_PROJECT_PATH: &str = "/browse";
pub const ADD_COMPONENT_PATH: &str = "/secure/project/AddComponent!default.jspa";
pub const EDIT_COMPONENT_PATH: &str = "/secure/project/EditComponent!default.jspa";
pub const DELETE_COMPONENT_PATH: &str = "/secure/project/DeleteComponent!default.jspa";
pub const SELECT_ASSIGNEES_PATH: &str = "/secure/project/SelectComponentAssignees!default.jspa";

/// Elements JIRA renders when a form submission was rejected
pub const ERROR_MARKER_SELECTOR: &str = ".errMsg, .aui-message.error, #login-form .error";

/// Used when the error marker is present but carries no text
pub const UNSPECIFIED_REMOTE_ERROR: &str = "JIRA reported an error without a message";

/// Response header JIRA's login filter uses to report the login outcome
pub const LOGIN_REASON_HEADER: &str = "X-Seraph-LoginReason";
