//! Tmux integration for trellis.
//!
//! # Submodules
//!
//! - [`commands`]: Low-level tmux command builders (NewSession, SplitWindow, etc.)
//! - [`control`]: The [`Multiplexer`] trait and its tmux-backed implementation
//!
//! The provisioner in [`crate::provision`] drives a [`Multiplexer`]; everything
//! here is plumbing between that trait and the tmux binary, plus the session
//! query helpers (`has_session`, `list_sessions`, `kill_session`) the CLI uses
//! directly.

mod commands;
mod control;

pub use commands::*;
pub use control::*;
