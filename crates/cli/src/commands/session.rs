//! Session lifecycle commands for trellis.
//!
//! - Launching: load the layout file, provision, attach (blocking)
//! - Listing running sessions
//! - Killing sessions

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use trellis_core::{
    ProvisionError, TmuxControl, load_layout_file, provision,
    tmux::{detach_session, has_session, kill_session, list_sessions},
};

use crate::display_path;

// =============================================================================
// Session Launching
// =============================================================================

/// Provision the named layout and attach to the resulting session.
///
/// Returns only after the user detaches or the session ends. On a
/// provisioning error, prints the kind and the failing step and exits with
/// the error's code; the attach step is never attempted after a failure.
pub fn do_launch(
    layout_path: &Path,
    layout_name: Option<&str>,
    session_override: Option<&str>,
) -> Result<()> {
    let file = load_layout_file(layout_path)?;
    let spec = file.resolve(layout_name, session_override)?;

    println!(
        "{} {} {} (layout: {})",
        "✔".green(),
        "Provisioning session".dimmed(),
        spec.name,
        layout_name.unwrap_or("default")
    );

    let mut mux = TmuxControl;
    if let Err(err) = provision(&spec, &mut mux) {
        eprintln!("{} {}", "✘".red(), err);
        if let ProvisionError::SessionAlreadyExists(name) = &err {
            eprintln!(
                "  {} tmux attach -t {}",
                "attach with:".dimmed(),
                name.blue()
            );
            eprintln!("  {} trellis -k {}", "or kill it: ".dimmed(), name.blue());
        }
        std::process::exit(err.exit_code());
    }

    Ok(())
}

// =============================================================================
// Session Listing
// =============================================================================

/// List running tmux sessions.
///
/// If `trellis_only` is true, only shows sessions created by trellis
/// (identified by the TRELLIS_LAYOUT environment variable).
pub fn do_list_sessions(trellis_only: bool) -> Result<()> {
    let sessions = list_sessions(trellis_only)?;

    if sessions.is_empty() {
        if trellis_only {
            println!("{}", "No trellis sessions running".dimmed());
        } else {
            println!("{}", "No tmux sessions running".dimmed());
        }
        return Ok(());
    }

    use comfy_table::{Table, presets::NOTHING};

    let mut table = Table::new();
    table.load_preset(NOTHING);

    for session in &sessions {
        let attached = if session.attached {
            "(attached)".green().to_string()
        } else {
            String::new()
        };

        let layout = session
            .layout_file
            .as_ref()
            .map(|f| display_path(Path::new(f)))
            .unwrap_or_else(|| "-".to_string());

        let panes_label = if session.panes == 1 { "pane" } else { "panes" };
        table.add_row(vec![
            session.name.blue().to_string(),
            layout.dimmed().to_string(),
            format!("{} {}", session.panes, panes_label)
                .dimmed()
                .to_string(),
            attached,
        ]);
    }

    println!("{table}");

    Ok(())
}

// =============================================================================
// Session Killing
// =============================================================================

/// Kill a session after a confirmation prompt.
pub fn do_kill_session(name: &str) -> Result<()> {
    if !has_session(name) {
        eprintln!("{} Session '{}' not found", "✘".red(), name);
        eprintln!();
        let _ = do_list_sessions(false);
        return Ok(());
    }

    use dialoguer::{Confirm, theme::ColorfulTheme};
    let theme = ColorfulTheme::default();
    let confirmed = Confirm::with_theme(&theme)
        .with_prompt(format!("Kill session '{}'?", name))
        .default(true)
        .interact()?;

    if !confirmed {
        println!("{}", "Cancelled".dimmed());
        return Ok(());
    }

    // Detach clients first to avoid issues
    detach_session(name)?;
    kill_session(name)?;

    println!("{} {} {}", "✔".green(), "Killed session".dimmed(), name);

    Ok(())
}
