//! # Command Line Interface
//!
//! Defines the CLI structure and command handlers for the jcomp tool: one
//! subcommand per component operation plus configuration and connectivity
//! helpers.

mod component;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, Subcommand};
use jcomp_core::Backend;
use jcomp_jira::AssigneeType;

use crate::clients::ConnectionOverrides;

/// Top-level CLI command for the jcomp tool
#[derive(Parser)]
#[command(name = "jcomp")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "Administer the components of JIRA projects")]
#[command(
  long_about = "jcomp creates, renames, and deletes JIRA project components and manages\n\
        their default assignee, through the REST API or the JIRA web forms."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// JIRA base URL (overrides config and JIRA_HOST)
  #[arg(long, global = true, value_name = "URL")]
  pub host: Option<String>,

  /// Backend used to talk to JIRA
  #[arg(long, global = true, value_enum, ignore_case = true)]
  pub backend: Option<Backend>,

  /// Credentials properties file with userName and password
  #[arg(long, global = true, value_name = "PATH")]
  pub credentials: Option<PathBuf>,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

impl Cli {
  fn overrides(&self) -> ConnectionOverrides {
    ConnectionOverrides {
      host: self.host.clone(),
      backend: self.backend,
      credentials: self.credentials.clone(),
    }
  }
}

/// Subcommands for the jcomp tool
#[derive(Subcommand)]
pub enum Commands {
  /// Create a component
  #[command(long_about = "Create a component in a project.\n\n\
            The description is set to \"<name> plugin\". Fails without changing\n\
            anything if the project already has a component with that name.")]
  Create(component::CreateArgs),

  /// Rename a component
  #[command(long_about = "Rename a component, keeping its description, lead, and\n\
            default assignee. Fails if the new name is already taken.")]
  #[command(alias = "mv")]
  Rename(component::RenameArgs),

  /// Delete a component, moving its issues to another component
  #[command(alias = "rm")]
  Delete(component::DeleteArgs),

  /// Set the default assignee policy of a component
  #[command(long_about = "Set the default assignee policy of a component.\n\n\
            The component lead is kept unless --lead is given.")]
  SetAssignee(component::SetAssigneeArgs),

  /// Set the default assignee policy and clear the component lead
  RemoveAssignee(component::RemoveAssigneeArgs),

  /// Check that JIRA accepts the configured credentials
  Check,

  /// Show or change the jcomp configuration
  #[command(long_about = "Show or change the jcomp configuration.\n\n\
            Without --show, the --host, --backend, and --credentials flags are saved to\n\
            config.toml in the jcomp configuration directory. JIRA_HOST, JCOMP_BACKEND,\n\
            and JCOMP_CREDENTIALS override the file.")]
  Config(config::ConfigArgs),

  /// Create a throwaway component and change its default assignee
  #[command(hide = true)]
  SmokeTest(smoke_test::SmokeTestArgs),
}

/// Assignee policy argument for CLI
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssigneeTypeArg {
  /// Use the project's default assignee
  ProjectDefault,
  /// Assign to the component lead
  ComponentLead,
  /// Assign to the project lead
  ProjectLead,
  /// Leave new issues unassigned
  Unassigned,
}

impl From<AssigneeTypeArg> for AssigneeType {
  fn from(arg: AssigneeTypeArg) -> Self {
    match arg {
      AssigneeTypeArg::ProjectDefault => AssigneeType::ProjectDefault,
      AssigneeTypeArg::ComponentLead => AssigneeType::ComponentLead,
      AssigneeTypeArg::ProjectLead => AssigneeType::ProjectLead,
      AssigneeTypeArg::Unassigned => AssigneeType::Unassigned,
    }
  }
}

pub fn handle_cli(cli: Cli) -> Result<()> {
  let overrides = cli.overrides();

  match cli.command {
    Commands::Create(args) => component::handle_create_command(&overrides, args),
    Commands::Rename(args) => component::handle_rename_command(&overrides, args),
    Commands::Delete(args) => component::handle_delete_command(&overrides, args),
    Commands::SetAssignee(args) => component::handle_set_assignee_command(&overrides, args),
    Commands::RemoveAssignee(args) => component::handle_remove_assignee_command(&overrides, args),
    Commands::Check => component::handle_check_command(&overrides),
    Commands::Config(args) => config::handle_config_command(&overrides, args),
    Commands::SmokeTest(args) => smoke_test::handle_smoke_test_command(&overrides, args),
  }
}
