//! Low-level tmux command wrappers
//!
//! This module provides builder-pattern wrappers for the tmux commands
//! trellis issues. Builders expose `build_args` separately from `run` so
//! argument synthesis stays testable without a tmux server.

use std::process::{Command, Output};

use anyhow::{Context, Result};

use crate::config::{SizeConstraint, SplitDirection};

/// Environment variable stored on provisioned sessions, holding the path of
/// the layout file the session was created from.
pub const TRELLIS_LAYOUT_ENV: &str = "TRELLIS_LAYOUT";

/// Execute a tmux command and return the output
fn tmux(args: &[&str]) -> Result<Output> {
    Command::new("tmux")
        .args(args)
        .output()
        .context("Failed to execute tmux command")
}

/// Execute a tmux command and check if it succeeded (suppressing stderr)
fn tmux_status(args: &[&str]) -> Result<bool> {
    Ok(Command::new("tmux")
        .args(args)
        .stderr(std::process::Stdio::null())
        .status()?
        .success())
}

/// Execute a tmux command, returning an error if it fails
fn tmux_run(args: &[&str]) -> Result<()> {
    let status = Command::new("tmux").args(args).status()?;
    if !status.success() {
        anyhow::bail!("tmux command failed: {:?}", args);
    }
    Ok(())
}

// =============================================================================
// Session Commands
// =============================================================================

/// Check if we're currently inside a tmux session
pub fn in_tmux() -> bool {
    std::env::var("TMUX").is_ok()
}

/// Get the current tmux session name (if inside tmux)
pub fn current_session() -> Option<String> {
    if !in_tmux() {
        return None;
    }
    let output = tmux(&["display-message", "-p", "#S"]).ok()?;
    let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if name.is_empty() { None } else { Some(name) }
}

/// Check if a tmux session exists
pub fn has_session(name: &str) -> bool {
    tmux_status(&["has-session", "-t", name]).unwrap_or(false)
}

/// Information about a tmux session
#[derive(Debug, Clone)]
pub struct SessionInfo {
    /// Session name
    pub name: String,
    /// Number of panes (across all windows)
    pub panes: u32,
    /// Whether clients are attached
    pub attached: bool,
    /// Layout file the session was provisioned from (trellis sessions only)
    pub layout_file: Option<String>,
}

/// Get the total number of panes in a session
fn count_session_panes(session: &str) -> u32 {
    // list-panes -s lists all panes across all windows in a session
    tmux(&["list-panes", "-s", "-t", session])
        .map(|o| String::from_utf8_lossy(&o.stdout).lines().count() as u32)
        .unwrap_or(0)
}

/// List all tmux sessions (optionally filtered to trellis sessions only)
pub fn list_sessions(trellis_only: bool) -> Result<Vec<SessionInfo>> {
    let output = tmux(&[
        "list-sessions",
        "-F",
        "#{session_name}\t#{session_attached}",
    ])?;

    if !output.status.success() {
        // No sessions exist
        return Ok(Vec::new());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut sessions = Vec::new();

    for line in stdout.lines() {
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() >= 2 {
            let name = parts[0].to_string();

            // Trellis sessions carry the layout file path in TRELLIS_LAYOUT
            let layout_file = get_environment(&name, TRELLIS_LAYOUT_ENV);

            if trellis_only && layout_file.is_none() {
                continue;
            }

            let panes = count_session_panes(&name);

            sessions.push(SessionInfo {
                name,
                panes,
                attached: parts[1] != "0",
                layout_file,
            });
        }
    }

    Ok(sessions)
}

/// Kill a tmux session
pub fn kill_session(name: &str) -> Result<()> {
    tmux_run(&["kill-session", "-t", name])
}

/// Set an environment variable on a tmux session
pub fn set_environment(session: &str, key: &str, value: &str) -> Result<()> {
    tmux_run(&["set-environment", "-t", session, key, value])
}

/// Get an environment variable from a tmux session
pub fn get_environment(session: &str, key: &str) -> Option<String> {
    let output = tmux(&["show-environment", "-t", session, key]).ok()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    // Output format is "KEY=value" or "-KEY" (if unset)
    stdout
        .trim()
        .strip_prefix(&format!("{}=", key))
        .map(|v| v.to_string())
}

/// Set a session option
pub fn set_option(session: &str, option: &str, value: &str) -> Result<()> {
    tmux_run(&["set-option", "-t", session, option, value])
}

/// Build the attach argument list. Inside tmux, attaching would nest
/// clients, so the current client is switched over instead.
fn attach_args(name: &str, inside_tmux: bool) -> Vec<String> {
    let command = if inside_tmux {
        "switch-client"
    } else {
        "attach-session"
    };
    vec![command.to_string(), "-t".to_string(), name.to_string()]
}

/// Attach to a tmux session (blocks until detach or session end)
pub fn attach_session(name: &str) -> Result<()> {
    let args = attach_args(name, in_tmux());
    let status = Command::new("tmux").args(&args).status()?;
    if !status.success() {
        anyhow::bail!("tmux {} -t {} exited with {}", args[0], name, status);
    }
    Ok(())
}

/// Detach all clients from a tmux session
pub fn detach_session(name: &str) -> Result<()> {
    // Silently ignore if no clients attached
    Command::new("tmux")
        .args(["detach-client", "-s", name])
        .stderr(std::process::Stdio::null())
        .status()
        .ok();
    Ok(())
}

/// Builder for creating new tmux sessions
#[derive(Default)]
pub struct NewSession<'a> {
    name: Option<&'a str>,
    detached: bool,
    start_dir: Option<&'a str>,
    window_name: Option<&'a str>,
}

impl<'a> NewSession<'a> {
    /// Create a new session builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session name
    pub fn name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    /// Start the session detached
    pub fn detached(mut self) -> Self {
        self.detached = true;
        self
    }

    /// Set the starting directory
    pub fn start_directory(mut self, dir: &'a str) -> Self {
        self.start_dir = Some(dir);
        self
    }

    /// Set the initial window name
    pub fn window_name(mut self, name: &'a str) -> Self {
        self.window_name = Some(name);
        self
    }

    /// Build the new-session argument list
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec!["new-session".to_string()];

        if self.detached {
            args.push("-d".to_string());
        }

        if let Some(name) = self.name {
            args.push("-s".to_string());
            args.push(name.to_string());
        }

        if let Some(dir) = self.start_dir {
            args.push("-c".to_string());
            args.push(dir.to_string());
        }

        if let Some(name) = self.window_name {
            args.push("-n".to_string());
            args.push(name.to_string());
        }

        args
    }

    /// Execute the new-session command
    pub fn run(self) -> Result<()> {
        let args = self.build_args();
        let args_ref: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
        tmux_run(&args_ref)
    }
}

// =============================================================================
// Pane Commands
// =============================================================================

/// Builder for splitting panes
#[derive(Default)]
pub struct SplitWindow<'a> {
    target: Option<&'a str>,
    direction: Option<SplitDirection>,
    size: Option<SizeConstraint>,
    start_dir: Option<&'a str>,
}

impl<'a> SplitWindow<'a> {
    /// Create a new split window builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target pane
    pub fn target(mut self, target: &'a str) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the split direction
    pub fn direction(mut self, direction: SplitDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Set the size of the new pane
    pub fn size(mut self, size: SizeConstraint) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the starting directory
    pub fn start_directory(mut self, dir: &'a str) -> Self {
        self.start_dir = Some(dir);
        self
    }

    /// Build the split-window argument list
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec!["split-window".to_string()];

        if let Some(target) = self.target {
            args.push("-t".to_string());
            args.push(target.to_string());
        }

        match self.direction {
            Some(SplitDirection::Horizontal) => args.push("-h".to_string()),
            Some(SplitDirection::Vertical) => args.push("-v".to_string()),
            None => {}
        }

        match self.size {
            Some(SizeConstraint::Lines(n)) => {
                args.push("-l".to_string());
                args.push(n.to_string());
            }
            Some(SizeConstraint::Percent(n)) => {
                args.push("-p".to_string());
                args.push(n.to_string());
            }
            None => {}
        }

        if let Some(dir) = self.start_dir {
            args.push("-c".to_string());
            args.push(dir.to_string());
        }

        // -P -F prints the new pane ID
        args.push("-P".to_string());
        args.push("-F".to_string());
        args.push("#{pane_id}".to_string());

        args
    }

    /// Run the split-window command and return the new pane ID
    pub fn run(self) -> Result<String> {
        let args = self.build_args();
        let args_ref: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
        let output = tmux(&args_ref)?;
        if !output.status.success() {
            anyhow::bail!(
                "split-window failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Get the pane ID for a target
pub fn get_pane_id(target: &str) -> Result<String> {
    let output = tmux(&["display-message", "-t", target, "-p", "#{pane_id}"])?;
    if !output.status.success() {
        anyhow::bail!("could not resolve pane id for '{}'", target);
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Build the send-keys argument list
fn send_keys_args(target: &str, keys: &str, execute: bool) -> Vec<String> {
    let mut args = vec![
        "send-keys".to_string(),
        "-t".to_string(),
        target.to_string(),
        keys.to_string(),
    ];
    if execute {
        args.push("Enter".to_string());
    }
    args
}

/// Send literal keys to a pane, optionally followed by Enter
pub fn send_keys(target: &str, keys: &str, execute: bool) -> Result<()> {
    let args = send_keys_args(target, keys, execute);
    let args_ref: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    tmux_run(&args_ref)
}

// =============================================================================
// Tests
// =============================================================================
