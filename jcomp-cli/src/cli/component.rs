//! # Component Commands
//!
//! One handler per component operation. Each opens its own session through
//! the configured backend.

use anyhow::Result;
use clap::Args;
use jcomp_core::output::{format_component, print_info, print_success};
use jcomp_jira::{AssigneeType, ComponentAdmin};

use super::AssigneeTypeArg;
use crate::clients::{ConnectionOverrides, create_admin_runtime};

/// Arguments for `create`
#[derive(Args)]
pub struct CreateArgs {
  /// Project key (e.g., JENKINS)
  pub project: String,

  /// Name of the new component
  pub name: String,

  /// User name of the component lead
  #[arg(long)]
  pub owner: Option<String>,

  /// Default assignee policy
  #[arg(long, value_enum)]
  pub assignee: Option<AssigneeTypeArg>,
}

/// Arguments for `rename`
#[derive(Args)]
pub struct RenameArgs {
  /// Project key (e.g., JENKINS)
  pub project: String,

  /// Current component name
  pub old_name: String,

  /// New component name
  pub new_name: String,
}

/// Arguments for `delete`
#[derive(Args)]
pub struct DeleteArgs {
  /// Project key (e.g., JENKINS)
  pub project: String,

  /// Component to delete
  pub name: String,

  /// Component that receives the deleted component's issues
  pub backup: String,
}

/// Arguments for `set-assignee`
#[derive(Args)]
pub struct SetAssigneeArgs {
  /// Project key (e.g., JENKINS)
  pub project: String,

  /// Component name
  pub name: String,

  /// New default assignee policy
  #[arg(value_enum)]
  pub assignee: AssigneeTypeArg,

  /// Replace the component lead with this user
  #[arg(long)]
  pub lead: Option<String>,
}

/// Arguments for `remove-assignee`
#[derive(Args)]
pub struct RemoveAssigneeArgs {
  /// Project key (e.g., JENKINS)
  pub project: String,

  /// Component name
  pub name: String,

  /// New default assignee policy
  #[arg(value_enum)]
  pub assignee: AssigneeTypeArg,
}

pub(crate) fn handle_create_command(overrides: &ConnectionOverrides, args: CreateArgs) -> Result<()> {
  let (rt, admin) = create_admin_runtime(overrides)?;
  let assignee = args.assignee.map(AssigneeType::from);

  rt.block_on(admin.create_component(&args.project, &args.name, args.owner.as_deref(), assignee))?;

  print_success(&format!("Created component {}", format_component(&args.project, &args.name)));
  Ok(())
}

pub(crate) fn handle_rename_command(overrides: &ConnectionOverrides, args: RenameArgs) -> Result<()> {
  let (rt, admin) = create_admin_runtime(overrides)?;

  rt.block_on(admin.rename_component(&args.project, &args.old_name, &args.new_name))?;

  print_success(&format!(
    "Renamed {} to {}",
    format_component(&args.project, &args.old_name),
    format_component(&args.project, &args.new_name)
  ));
  Ok(())
}

pub(crate) fn handle_delete_command(overrides: &ConnectionOverrides, args: DeleteArgs) -> Result<()> {
  let (rt, admin) = create_admin_runtime(overrides)?;

  rt.block_on(admin.delete_component(&args.project, &args.name, &args.backup))?;

  print_success(&format!(
    "Deleted {}, issues moved to {}",
    format_component(&args.project, &args.name),
    format_component(&args.project, &args.backup)
  ));
  Ok(())
}

pub(crate) fn handle_set_assignee_command(overrides: &ConnectionOverrides, args: SetAssigneeArgs) -> Result<()> {
  let (rt, admin) = create_admin_runtime(overrides)?;
  let assignee = AssigneeType::from(args.assignee);

  rt.block_on(admin.set_default_assignee(&args.project, &args.name, assignee, args.lead.as_deref()))?;

  print_success(&format!(
    "Default assignee of {} set to {}",
    format_component(&args.project, &args.name),
    assignee
  ));
  if let Some(lead) = &args.lead {
    print_info(&format!("Component lead is now {lead}"));
  }
  Ok(())
}

pub(crate) fn handle_remove_assignee_command(overrides: &ConnectionOverrides, args: RemoveAssigneeArgs) -> Result<()> {
  let (rt, admin) = create_admin_runtime(overrides)?;
  let assignee = AssigneeType::from(args.assignee);

  rt.block_on(admin.remove_default_assignee(&args.project, &args.name, assignee))?;

  print_success(&format!(
    "Removed the lead of {}, default assignee is {}",
    format_component(&args.project, &args.name),
    assignee
  ));
  Ok(())
}

pub(crate) fn handle_check_command(overrides: &ConnectionOverrides) -> Result<()> {
  let (rt, admin) = create_admin_runtime(overrides)?;

  rt.block_on(admin.check_connection())?;

  print_success("JIRA accepted the configured credentials");
  Ok(())
}
