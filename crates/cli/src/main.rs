//! Trellis CLI - declarative tmux session layout provisioner.
//!
//! Trellis reads a layout file (`trellis.yaml`) describing a session as an
//! ordered list of panes, provisions that session against a running tmux
//! server, and attaches to it. The launched programs are opaque commands;
//! trellis neither parses their output nor manages their lifecycle.
//!
//! # Workflow
//!
//! 1. User runs `trellis` in a project directory
//! 2. CLI finds `trellis.yaml` by walking up the directory tree
//! 3. The named layout is resolved into a session spec
//! 4. The provisioner issues create/split/send-keys against tmux, then attaches
//!
//! Core functionality (config parsing, provisioning, tmux commands) is in
//! `trellis-core`.

mod cli;
mod commands;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use colored::Colorize;
use trellis_core::tmux::current_session;

/// Default layout file name
const LAYOUT_FILE: &str = "trellis.yaml";

fn main() -> Result<()> {
    let cli = Cli::parse();
    let layout_path = resolve_layout_path(cli.file.as_deref());

    // Handle subcommands first
    if let Some(command) = cli.command {
        return match command {
            Commands::Init => commands::layout::init_layout_file(),
            Commands::List { all } => commands::session::do_list_sessions(!all),
            Commands::Show { layout, json } => {
                commands::layout::show_layout(&layout_path, layout.as_deref(), json)
            }
        };
    }

    if let Some(name) = cli.kill {
        let session_name = if name.is_empty() {
            // No session specified, try to detect the current tmux session
            current_session().ok_or_else(|| {
                anyhow::anyhow!(
                    "Not inside a tmux session. Specify a session name: trellis -k <session>"
                )
            })?
        } else {
            name
        };
        return commands::session::do_kill_session(&session_name);
    }

    if cli.file.is_some() || layout_path.exists() {
        commands::session::do_launch(&layout_path, cli.layout.as_deref(), cli.session.as_deref())
    } else if cli.layout.is_some() {
        eprintln!(
            "{} No {} found. Run '{}' to create one.",
            "✘".red(),
            LAYOUT_FILE,
            "trellis init".blue()
        );
        std::process::exit(1)
    } else {
        Cli::command().print_help()?;
        Ok(())
    }
}

// =============================================================================
// Path Resolution
// =============================================================================

/// Resolve the layout file path from the CLI option or by walking up the
/// directory tree looking for trellis.yaml
fn resolve_layout_path(cli_path: Option<&str>) -> PathBuf {
    if let Some(p) = cli_path {
        let path = PathBuf::from(p);
        return path.canonicalize().unwrap_or(path);
    }

    let mut current = std::env::current_dir().unwrap_or_default();
    loop {
        let candidate = current.join(LAYOUT_FILE);
        if candidate.exists() {
            return candidate.canonicalize().unwrap_or(candidate);
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => break,
        }
    }

    std::env::current_dir().unwrap_or_default().join(LAYOUT_FILE)
}

/// Convert absolute path to display path (replace home with ~)
pub fn display_path(path: &Path) -> String {
    dirs::home_dir()
        .and_then(|home| {
            path.strip_prefix(&home)
                .ok()
                .map(|rel| Path::new("~").join(rel).display().to_string())
        })
        .unwrap_or_else(|| path.display().to_string())
}
