//! The layout provisioner
//!
//! Translates a [`SessionSpec`] into a strictly ordered sequence of calls
//! against a [`Multiplexer`], then attaches the invoking terminal:
//!
//! 1. Fail fast if the session name collides with a live session.
//! 2. Create the detached session (pane 0).
//! 3. Split off every later pane in declaration order.
//! 4. Send each non-empty startup command, in declaration order.
//! 5. Attach (blocks until the user detaches or the session ends).
//!
//! There is exactly one path through the sequence; errors abort it without
//! rollback and the partial session stays alive for inspection.

use crate::{
    config::{SessionSpec, expand_path},
    error::{ProvisionError, ProvisionStep},
    tmux::{Multiplexer, TRELLIS_LAYOUT_ENV},
};

/// Wrap a multiplexer failure with the step it happened in, except for a
/// missing tmux binary, which is its own kind.
fn step_error(step: ProvisionStep, cause: anyhow::Error) -> ProvisionError {
    let tmux_missing = cause.chain().any(|err| {
        err.downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
    });
    if tmux_missing {
        ProvisionError::MultiplexerUnavailable(cause.to_string())
    } else {
        ProvisionError::Step { step, cause }
    }
}

/// Provision a session from its spec and attach to it.
///
/// The provisioner is stateless: the only bookkeeping is the table of pane
/// ids built while splitting, used to resolve `target` references. Command
/// dispatch is fire-and-forget; nothing waits for the started programs.
pub fn provision(spec: &SessionSpec, mux: &mut dyn Multiplexer) -> Result<(), ProvisionError> {
    spec.validate()?;

    if mux.has_session(&spec.name) {
        return Err(ProvisionError::SessionAlreadyExists(spec.name.clone()));
    }

    let root = &spec.panes[0];
    let root_dir = root
        .dir
        .as_deref()
        .map(expand_path)
        .unwrap_or_else(|| ".".to_string());

    let root_id = mux
        .create_session(&spec.name, spec.window.as_deref(), &root_dir)
        .map_err(|e| step_error(ProvisionStep::CreateSession, e))?;

    // Tag the session with its layout file so listing and cleanup find it
    if let Some(origin) = &spec.origin {
        mux.set_environment(&spec.name, TRELLIS_LAYOUT_ENV, origin).ok();
    }

    let mut pane_ids = vec![root_id];

    for (index, pane) in spec.panes.iter().enumerate().skip(1) {
        let target = pane.target.unwrap_or(index - 1);
        if target >= pane_ids.len() {
            return Err(ProvisionError::PaneResolution {
                index,
                target,
                existing: pane_ids.len(),
            });
        }

        // validate() guarantees a direction on every non-root pane
        let direction = pane.split.expect("validated split direction");
        let dir = pane.dir.as_deref().map(expand_path);

        let new_id = mux
            .split_pane(&pane_ids[target], direction, pane.size, dir.as_deref())
            .map_err(|e| step_error(ProvisionStep::SplitPane(index), e))?;
        pane_ids.push(new_id);
    }

    for (index, pane) in spec.panes.iter().enumerate() {
        let Some(command) = pane.command.as_deref().filter(|c| !c.is_empty()) else {
            continue;
        };
        mux.send_keys(&pane_ids[index], command, true)
            .map_err(|e| step_error(ProvisionStep::SendKeys(index), e))?;
    }

    mux.attach(&spec.name)
        .map_err(|e| step_error(ProvisionStep::Attach, e))
}

// =============================================================================
// Tests
// =============================================================================
