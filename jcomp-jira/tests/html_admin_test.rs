//! Component operations against mocked JIRA web pages.

use std::time::Duration;

use jcomp_core::Credentials;
use jcomp_jira::html::ComponentRow;
use jcomp_jira::{AssigneeType, ComponentAdmin, ComponentError, HtmlComponentAdmin, component_error};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BROWSE_PAGE: &str = r#"<html><head><meta name="ajs-pid" content="10172"></head><body>Jenkins</body></html>"#;

const ASSIGNEES_PAGE: &str = r#"
<html><body>
<form name="jiraform" action="SelectComponentAssignees.jspa" method="post">
  <input type="hidden" name="atl_token" value="tok">
  <input type="hidden" name="projectId" value="10172">
  <table>
    <tr><th>Component</th><th>Default Assignee</th></tr>
    <tr>
      <td><b>core</b></td>
      <td>
        <input type="radio" name="component_10010" value="0">
        <input type="radio" name="component_10010" value="1" checked>
        <input type="radio" name="component_10010" value="2">
        <input type="radio" name="component_10010" value="3">
      </td>
    </tr>
    <tr>
      <td><b>git-plugin</b></td>
      <td>
        <input type="radio" name="component_10011" value="0" checked>
        <input type="radio" name="component_10011" value="1">
        <input type="radio" name="component_10011" value="2">
        <input type="radio" name="component_10011" value="3">
      </td>
    </tr>
  </table>
  <input type="submit" name="Update" value="Update">
</form>
</body></html>
"#;

const EDIT_PAGE: &str = r#"
<html><body>
<form name="jiraform" action="EditComponent.jspa" method="post">
  <input type="hidden" name="atl_token" value="tok">
  <input type="hidden" name="id" value="10010">
  <input type="text" name="name" value="core">
  <textarea name="description">core plugin</textarea>
  <input type="text" name="componentLead" value="alice">
  <select name="assigneeType">
    <option value="0">Project Default</option>
    <option value="1" selected>Component Lead</option>
    <option value="2">Project Lead</option>
    <option value="3">Unassigned</option>
  </select>
  <input type="submit" name="Update" value="Update">
</form>
</body></html>
"#;

/// Edit form of older JIRA versions, without the assignee policy
const LEGACY_EDIT_PAGE: &str = r#"
<html><body>
<form name="jiraform" action="EditComponent.jspa" method="post">
  <input type="hidden" name="atl_token" value="tok">
  <input type="hidden" name="id" value="10011">
  <input type="text" name="name" value="git-plugin">
  <textarea name="description">git-plugin plugin</textarea>
  <input type="text" name="componentLead" value="">
  <input type="submit" name="Update" value="Update">
</form>
</body></html>
"#;

const DELETE_PAGE: &str = r#"
<html><body>
<form name="jiraform" action="DeleteComponent.jspa" method="post">
  <input type="hidden" name="atl_token" value="tok">
  <input type="hidden" name="id" value="10010">
  <input type="radio" name="action" value="remove" checked>
  <input type="radio" name="action" value="swap">
  <select name="moveIssuesTo">
    <option value="10011">git-plugin</option>
  </select>
  <input type="submit" name="Delete" value="Delete">
</form>
</body></html>
"#;

const ADD_PAGE: &str = r#"
<html><body>
<form name="jiraform" action="AddComponent.jspa" method="post">
  <input type="hidden" name="atl_token" value="tok">
  <input type="hidden" name="pid" value="10172">
  <input type="text" name="name">
  <textarea name="description"></textarea>
  <input type="text" name="componentLead">
  <select name="assigneeType">
    <option value="0">Project Default</option>
    <option value="1">Component Lead</option>
    <option value="2">Project Lead</option>
    <option value="3">Unassigned</option>
  </select>
  <input type="submit" name="Add" value="Add">
</form>
</body></html>
"#;

const SAVED_PAGE: &str = "<html><body><p>Saved</p></body></html>";

fn html(body: &str) -> ResponseTemplate {
  ResponseTemplate::new(200)
    .insert_header("Content-Type", "text/html;charset=UTF-8")
    .set_body_string(body)
}

fn admin_for(server: &MockServer) -> HtmlComponentAdmin {
  let credentials = Credentials {
    username: "kohsuke".to_string(),
    password: "secret".to_string(),
  };
  HtmlComponentAdmin::new(&server.uri(), credentials, Duration::from_secs(5))
}

async fn mount_login(server: &MockServer) {
  Mock::given(method("POST"))
    .and(path("/login.jsp"))
    .and(body_string_contains("os_username=kohsuke"))
    .and(body_string_contains("os_password=secret"))
    .respond_with(html("<html><body>Dashboard</body></html>").insert_header("Set-Cookie", "JSESSIONID=abc; Path=/"))
    .mount(server)
    .await;
}

/// Login plus the pages every operation reads before submitting anything
async fn mount_jenkins_pages(server: &MockServer) {
  mount_login(server).await;

  Mock::given(method("GET"))
    .and(path("/browse/JENKINS"))
    .respond_with(html(BROWSE_PAGE))
    .mount(server)
    .await;

  Mock::given(method("GET"))
    .and(path("/secure/project/SelectComponentAssignees!default.jspa"))
    .and(query_param("projectId", "10172"))
    .respond_with(html(ASSIGNEES_PAGE))
    .mount(server)
    .await;

  Mock::given(method("GET"))
    .and(path("/secure/project/EditComponent!default.jspa"))
    .and(query_param("id", "10010"))
    .respond_with(html(EDIT_PAGE))
    .mount(server)
    .await;

  Mock::given(method("GET"))
    .and(path("/secure/project/EditComponent!default.jspa"))
    .and(query_param("id", "10011"))
    .respond_with(html(LEGACY_EDIT_PAGE))
    .mount(server)
    .await;

  Mock::given(method("GET"))
    .and(path("/secure/project/DeleteComponent!default.jspa"))
    .and(query_param("id", "10010"))
    .respond_with(html(DELETE_PAGE))
    .mount(server)
    .await;

  Mock::given(method("GET"))
    .and(path("/secure/project/AddComponent!default.jspa"))
    .and(query_param("pid", "10172"))
    .respond_with(html(ADD_PAGE))
    .mount(server)
    .await;
}

async fn forbid_post(server: &MockServer, form_path: &str) {
  Mock::given(method("POST"))
    .and(path(form_path))
    .respond_with(html(SAVED_PAGE))
    .expect(0)
    .mount(server)
    .await;
}

#[tokio::test]
async fn test_login_error_marker_fails_validation() -> anyhow::Result<()> {
  let server = MockServer::start().await;

  Mock::given(method("POST"))
    .and(path("/login.jsp"))
    .respond_with(html(
      r#"<html><body><div id="login-form"><p class="error">
        Sorry, your username and password are incorrect - please try again.
      </p></div></body></html>"#,
    ))
    .mount(&server)
    .await;

  let err = admin_for(&server).check_connection().await.unwrap_err();
  assert_eq!(
    component_error(&err),
    Some(&ComponentError::RemoteValidation(
      "Sorry, your username and password are incorrect - please try again.".to_string()
    ))
  );

  Ok(())
}

#[tokio::test]
async fn test_login_reason_header_fails_validation() -> anyhow::Result<()> {
  let server = MockServer::start().await;

  Mock::given(method("POST"))
    .and(path("/login.jsp"))
    .respond_with(html("<html><body>Log in</body></html>").insert_header("X-Seraph-LoginReason", "AUTHENTICATED_FAILED"))
    .mount(&server)
    .await;

  let err = admin_for(&server).check_connection().await.unwrap_err();
  match component_error(&err) {
    Some(ComponentError::RemoteValidation(message)) => assert!(message.contains("AUTHENTICATED_FAILED")),
    other => panic!("unexpected error: {other:?}"),
  }

  Ok(())
}

#[tokio::test]
async fn test_check_connection() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  mount_login(&server).await;

  admin_for(&server).check_connection().await?;
  Ok(())
}

#[tokio::test]
async fn test_find_component_reads_assignees_table() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  mount_jenkins_pages(&server).await;
  let admin = admin_for(&server);

  assert_eq!(
    admin.find_component("JENKINS", "git-plugin").await?,
    ComponentRow {
      id: "10011".to_string(),
      name: "git-plugin".to_string(),
      control: "component_10011".to_string(),
    }
  );

  let err = admin.find_component("JENKINS", "missing").await.unwrap_err();
  assert_eq!(
    component_error(&err),
    Some(&ComponentError::NotFound {
      project: "JENKINS".to_string(),
      name: "missing".to_string(),
    })
  );

  Ok(())
}

#[tokio::test]
async fn test_session_cookie_is_reused() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  mount_login(&server).await;

  Mock::given(method("GET"))
    .and(path("/browse/JENKINS"))
    .and(header("Cookie", "JSESSIONID=abc"))
    .respond_with(html(BROWSE_PAGE))
    .expect(1)
    .mount(&server)
    .await;

  Mock::given(method("GET"))
    .and(path("/secure/project/SelectComponentAssignees!default.jspa"))
    .respond_with(html(ASSIGNEES_PAGE))
    .mount(&server)
    .await;

  admin_for(&server).find_component("JENKINS", "core").await?;
  Ok(())
}

#[tokio::test]
async fn test_set_default_assignee_submits_ordinal() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  mount_jenkins_pages(&server).await;
  forbid_post(&server, "/secure/project/EditComponent.jspa").await;

  Mock::given(method("POST"))
    .and(path("/secure/project/SelectComponentAssignees.jspa"))
    .and(body_string_contains("atl_token=tok"))
    .and(body_string_contains("component_10010=2"))
    .and(body_string_contains("component_10011=0"))
    .respond_with(html(SAVED_PAGE))
    .expect(1)
    .mount(&server)
    .await;

  admin_for(&server)
    .set_default_assignee("JENKINS", "core", AssigneeType::ProjectLead, None)
    .await?;

  Ok(())
}

#[tokio::test]
async fn test_set_default_assignee_with_lead_override() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  mount_jenkins_pages(&server).await;
  forbid_post(&server, "/secure/project/SelectComponentAssignees.jspa").await;

  Mock::given(method("POST"))
    .and(path("/secure/project/EditComponent.jspa"))
    .and(body_string_contains("componentLead=bob"))
    .and(body_string_contains("assigneeType=2"))
    .respond_with(html(SAVED_PAGE))
    .expect(1)
    .mount(&server)
    .await;

  admin_for(&server)
    .set_default_assignee("JENKINS", "core", AssigneeType::ProjectLead, Some("bob"))
    .await?;

  Ok(())
}

#[tokio::test]
async fn test_lead_and_policy_rejected_together() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  mount_jenkins_pages(&server).await;
  forbid_post(&server, "/secure/project/SelectComponentAssignees.jspa").await;

  Mock::given(method("POST"))
    .and(path("/secure/project/EditComponent.jspa"))
    .respond_with(html(
      r#"<html><body><span class="errMsg">Unassigned issues are turned off.</span></body></html>"#,
    ))
    .expect(1)
    .mount(&server)
    .await;

  let err = admin_for(&server)
    .remove_default_assignee("JENKINS", "core", AssigneeType::Unassigned)
    .await
    .unwrap_err();
  assert_eq!(
    component_error(&err),
    Some(&ComponentError::RemoteValidation(
      "Unassigned issues are turned off.".to_string()
    ))
  );

  Ok(())
}

#[tokio::test]
async fn test_legacy_edit_form_loads_both_forms_first() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  mount_jenkins_pages(&server).await;

  Mock::given(method("POST"))
    .and(path("/secure/project/EditComponent.jspa"))
    .and(body_string_contains("componentLead=carol"))
    .respond_with(html(SAVED_PAGE))
    .expect(1)
    .mount(&server)
    .await;

  Mock::given(method("POST"))
    .and(path("/secure/project/SelectComponentAssignees.jspa"))
    .and(body_string_contains("component_10011=1"))
    .respond_with(html(SAVED_PAGE))
    .expect(1)
    .mount(&server)
    .await;

  admin_for(&server)
    .set_default_assignee("JENKINS", "git-plugin", AssigneeType::ComponentLead, Some("carol"))
    .await?;

  let requests = server.received_requests().await.unwrap_or_default();
  let posts: Vec<usize> = requests
    .iter()
    .enumerate()
    .filter(|(_, r)| r.method.as_str() == "POST" && r.url.path() != "/login.jsp")
    .map(|(i, _)| i)
    .collect();
  let last_get = requests
    .iter()
    .rposition(|r| r.method.as_str() == "GET")
    .unwrap();
  assert_eq!(posts.len(), 2);
  assert!(last_get < posts[0], "a form was loaded after the first submission");
  assert_eq!(requests[posts[0]].url.path(), "/secure/project/EditComponent.jspa");

  Ok(())
}

#[tokio::test]
async fn test_set_default_assignee_missing_component() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  mount_jenkins_pages(&server).await;
  forbid_post(&server, "/secure/project/SelectComponentAssignees.jspa").await;

  let err = admin_for(&server)
    .set_default_assignee("JENKINS", "missing", AssigneeType::ComponentLead, None)
    .await
    .unwrap_err();
  assert!(matches!(component_error(&err), Some(ComponentError::NotFound { .. })));

  Ok(())
}

#[tokio::test]
async fn test_remove_default_assignee_clears_lead() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  mount_jenkins_pages(&server).await;
  forbid_post(&server, "/secure/project/SelectComponentAssignees.jspa").await;

  Mock::given(method("POST"))
    .and(path("/secure/project/EditComponent.jspa"))
    .and(body_string_contains("componentLead=&"))
    .and(body_string_contains("assigneeType=3"))
    .respond_with(html(SAVED_PAGE))
    .expect(1)
    .mount(&server)
    .await;

  admin_for(&server)
    .remove_default_assignee("JENKINS", "core", AssigneeType::Unassigned)
    .await?;

  Ok(())
}

#[tokio::test]
async fn test_submission_error_marker() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  mount_jenkins_pages(&server).await;

  Mock::given(method("POST"))
    .and(path("/secure/project/EditComponent.jspa"))
    .respond_with(html(
      r#"<html><body><span class="errMsg">The user "ghost" does not exist.</span></body></html>"#,
    ))
    .mount(&server)
    .await;
  forbid_post(&server, "/secure/project/SelectComponentAssignees.jspa").await;

  let err = admin_for(&server)
    .set_default_assignee("JENKINS", "core", AssigneeType::ComponentLead, Some("ghost"))
    .await
    .unwrap_err();
  assert_eq!(
    component_error(&err),
    Some(&ComponentError::RemoteValidation(
      r#"The user "ghost" does not exist."#.to_string()
    ))
  );

  Ok(())
}

#[tokio::test]
async fn test_rename_keeps_prefilled_fields() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  mount_jenkins_pages(&server).await;

  Mock::given(method("POST"))
    .and(path("/secure/project/EditComponent.jspa"))
    .and(body_string_contains("name=jenkins-core"))
    .and(body_string_contains("componentLead=alice"))
    .and(body_string_contains("description=core+plugin"))
    .respond_with(html(SAVED_PAGE))
    .expect(1)
    .mount(&server)
    .await;

  admin_for(&server)
    .rename_component("JENKINS", "core", "jenkins-core")
    .await?;

  Ok(())
}

#[tokio::test]
async fn test_rename_to_existing_name_conflicts() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  mount_jenkins_pages(&server).await;
  forbid_post(&server, "/secure/project/EditComponent.jspa").await;

  let err = admin_for(&server)
    .rename_component("JENKINS", "core", "git-plugin")
    .await
    .unwrap_err();
  assert!(matches!(component_error(&err), Some(ComponentError::Conflict { .. })));

  Ok(())
}

#[tokio::test]
async fn test_delete_selects_backup() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  mount_jenkins_pages(&server).await;

  Mock::given(method("POST"))
    .and(path("/secure/project/DeleteComponent.jspa"))
    .and(body_string_contains("action=swap"))
    .and(body_string_contains("moveIssuesTo=10011"))
    .respond_with(html(SAVED_PAGE))
    .expect(1)
    .mount(&server)
    .await;

  admin_for(&server)
    .delete_component("JENKINS", "core", "git-plugin")
    .await?;

  Ok(())
}

#[tokio::test]
async fn test_delete_requires_backup() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  mount_jenkins_pages(&server).await;
  forbid_post(&server, "/secure/project/DeleteComponent.jspa").await;

  let err = admin_for(&server)
    .delete_component("JENKINS", "core", "missing-backup")
    .await
    .unwrap_err();
  assert_eq!(
    component_error(&err),
    Some(&ComponentError::NotFound {
      project: "JENKINS".to_string(),
      name: "missing-backup".to_string(),
    })
  );

  Ok(())
}

#[tokio::test]
async fn test_create_component_fills_form() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  mount_jenkins_pages(&server).await;

  Mock::given(method("POST"))
    .and(path("/secure/project/AddComponent.jspa"))
    .and(body_string_contains("name=kohsuke-test"))
    .and(body_string_contains("description=kohsuke-test+plugin"))
    .and(body_string_contains("componentLead=kohsuke"))
    .and(body_string_contains("assigneeType=1"))
    .and(body_string_contains("pid=10172"))
    .respond_with(html(SAVED_PAGE))
    .expect(1)
    .mount(&server)
    .await;

  admin_for(&server)
    .create_component("JENKINS", "kohsuke-test", Some("kohsuke"), Some(AssigneeType::ComponentLead))
    .await?;

  Ok(())
}

#[tokio::test]
async fn test_create_existing_component_is_rejected() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  mount_jenkins_pages(&server).await;
  forbid_post(&server, "/secure/project/AddComponent.jspa").await;

  let err = admin_for(&server)
    .create_component("JENKINS", "core", None, None)
    .await
    .unwrap_err();
  assert!(matches!(component_error(&err), Some(ComponentError::AlreadyExists { .. })));

  Ok(())
}

#[tokio::test]
async fn test_project_without_id() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  mount_login(&server).await;

  Mock::given(method("GET"))
    .and(path("/browse/NOPE"))
    .respond_with(html("<html><body>Project not found</body></html>"))
    .mount(&server)
    .await;

  let err = admin_for(&server).find_component("NOPE", "core").await.unwrap_err();
  assert_eq!(
    component_error(&err),
    Some(&ComponentError::ProjectNotFound("NOPE".to_string()))
  );

  Ok(())
}
