//! Provisioning error taxonomy
//!
//! Every error aborts the remaining provisioning sequence; nothing retries
//! and nothing rolls back. Each kind carries enough context (the step, the
//! offending pane reference) to diagnose a partial session.

use std::fmt;

use thiserror::Error;

/// Which step of the provisioning sequence failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStep {
    /// Creating the detached session (pane 0)
    CreateSession,
    /// Splitting off pane `N`
    SplitPane(usize),
    /// Sending the startup command to pane `N`
    SendKeys(usize),
    /// Attaching the terminal to the finished session
    Attach,
}

impl fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisionStep::CreateSession => write!(f, "create-session"),
            ProvisionStep::SplitPane(index) => write!(f, "split for pane {}", index),
            ProvisionStep::SendKeys(index) => write!(f, "send-keys to pane {}", index),
            ProvisionStep::Attach => write!(f, "attach"),
        }
    }
}

/// Errors surfaced by [`provision`](crate::provision::provision)
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The target session name collides with a live session
    #[error("session '{0}' already exists")]
    SessionAlreadyExists(String),

    /// A pane references a split target that does not exist yet
    #[error("pane {index} targets pane {target}, but only {existing} pane(s) exist")]
    PaneResolution {
        /// Index of the offending pane in the layout
        index: usize,
        /// The referenced target pane index
        target: usize,
        /// Panes created so far
        existing: usize,
    },

    /// The tmux binary could not be reached at all
    #[error("cannot reach tmux: {0}")]
    MultiplexerUnavailable(String),

    /// The spec violates an input constraint (checked before any tmux call)
    #[error("invalid layout: {0}")]
    InvalidSpec(String),

    /// A tmux call failed mid-sequence; the partial session is left alive
    #[error("{step} failed: {cause}")]
    Step {
        /// The step that failed
        step: ProvisionStep,
        /// The underlying tmux failure
        cause: anyhow::Error,
    },
}

impl ProvisionError {
    /// Exit code for the CLI, one per distinguishable kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            ProvisionError::SessionAlreadyExists(_) => 2,
            ProvisionError::PaneResolution { .. } => 3,
            ProvisionError::MultiplexerUnavailable(_) => 4,
            ProvisionError::InvalidSpec(_) | ProvisionError::Step { .. } => 1,
        }
    }
}
