//! The multiplexer control interface
//!
//! [`Multiplexer`] is the seam between the provisioner and the external
//! multiplexer server: the provisioner only ever issues these operations.
//! [`TmuxControl`] is the production implementation over the tmux binary;
//! tests substitute a recording fake.

use anyhow::Result;

use super::commands::{self, NewSession, SplitWindow};
use crate::config::{SizeConstraint, SplitDirection};

/// Control surface of a terminal multiplexer
pub trait Multiplexer {
    /// Whether a live session with this name exists
    fn has_session(&self, name: &str) -> bool;

    /// Create a named detached session; returns the root pane's id
    fn create_session(
        &mut self,
        name: &str,
        window: Option<&str>,
        start_dir: &str,
    ) -> Result<String>;

    /// Split an existing pane; returns the new pane's id
    fn split_pane(
        &mut self,
        target: &str,
        direction: SplitDirection,
        size: Option<SizeConstraint>,
        start_dir: Option<&str>,
    ) -> Result<String>;

    /// Send literal keys to a pane, optionally followed by Enter
    fn send_keys(&mut self, target: &str, keys: &str, execute: bool) -> Result<()>;

    /// Set an environment variable on a session
    fn set_environment(&mut self, session: &str, key: &str, value: &str) -> Result<()>;

    /// Attach the controlling terminal; blocks until detach or session end
    fn attach(&mut self, session: &str) -> Result<()>;
}

/// Production [`Multiplexer`] backed by the tmux binary
pub struct TmuxControl;

impl Multiplexer for TmuxControl {
    fn has_session(&self, name: &str) -> bool {
        commands::has_session(name)
    }

    fn create_session(
        &mut self,
        name: &str,
        window: Option<&str>,
        start_dir: &str,
    ) -> Result<String> {
        let mut session = NewSession::new()
            .name(name)
            .detached()
            .start_directory(start_dir);
        if let Some(window) = window {
            session = session.window_name(window);
        }
        session.run()?;

        // Mouse scrollback; ignored if the server rejects the option
        commands::set_option(name, "mouse", "on").ok();

        commands::get_pane_id(&format!("{}:0.0", name))
    }

    fn split_pane(
        &mut self,
        target: &str,
        direction: SplitDirection,
        size: Option<SizeConstraint>,
        start_dir: Option<&str>,
    ) -> Result<String> {
        let mut split = SplitWindow::new().target(target).direction(direction);
        if let Some(size) = size {
            split = split.size(size);
        }
        if let Some(dir) = start_dir {
            split = split.start_directory(dir);
        }
        split.run()
    }

    fn send_keys(&mut self, target: &str, keys: &str, execute: bool) -> Result<()> {
        commands::send_keys(target, keys, execute)
    }

    fn set_environment(&mut self, session: &str, key: &str, value: &str) -> Result<()> {
        commands::set_environment(session, key, value)
    }

    fn attach(&mut self, session: &str) -> Result<()> {
        commands::attach_session(session)
    }
}
