//! # Config Command
//!
//! Shows the configuration in effect, or writes the connection flags given
//! on the command line to the config file.

use anyhow::{Result, bail};
use clap::Args;
use jcomp_core::get_config_dirs;
use jcomp_core::output::{print_info, print_success};
use jcomp_core::url::normalize_base_url;
use owo_colors::OwoColorize;

use crate::clients::{ConnectionOverrides, resolve_config};

/// Arguments for `config`
#[derive(Args)]
pub struct ConfigArgs {
  /// Show the configuration in effect instead of saving --host, --backend,
  /// and --credentials
  #[arg(long)]
  pub show: bool,
}

pub(crate) fn handle_config_command(overrides: &ConnectionOverrides, args: ConfigArgs) -> Result<()> {
  if args.show {
    handle_show_config(overrides)
  } else if overrides.host.is_some() || overrides.backend.is_some() || overrides.credentials.is_some() {
    handle_set_config(overrides)
  } else {
    bail!("Please specify --host, --backend, --credentials, or --show")
  }
}

fn handle_show_config(overrides: &ConnectionOverrides) -> Result<()> {
  let dirs = get_config_dirs()?;
  let config = resolve_config(&dirs, overrides)?;

  print_info("Current jcomp configuration:");
  println!("  {}: {}", "Config file".bold(), dirs.config_path().display());
  println!("  {}: {}", "Host".bold(), config.host);
  println!("  {}: {}", "Backend".bold(), config.backend);
  println!(
    "  {}: {}",
    "Credentials".bold(),
    config.credentials_path(&dirs).display()
  );
  println!("  {}: {}s", "Timeout".bold(), config.timeout_secs);

  Ok(())
}

fn handle_set_config(overrides: &ConnectionOverrides) -> Result<()> {
  let dirs = get_config_dirs()?;
  // Only the file is updated; environment overrides are not persisted
  let mut config = dirs.load_config()?;

  if let Some(host) = &overrides.host {
    config.host = normalize_base_url(host)?;
  }
  if let Some(backend) = overrides.backend {
    config.backend = backend;
  }
  if let Some(credentials) = &overrides.credentials {
    config.credentials = Some(credentials.clone());
  }

  dirs.save_config(&config)?;
  print_success(&format!("Configuration saved to {}", dirs.config_path().display()));
  Ok(())
}
