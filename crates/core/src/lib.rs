//! Trellis Core - Core library for the trellis session provisioner
//!
//! This crate provides the core functionality for trellis including:
//! - Layout configuration parsing and types
//! - The layout provisioner and its error taxonomy
//! - Tmux command wrappers and the multiplexer control interface

pub mod config;
pub mod error;
pub mod provision;
pub mod tmux;

// Re-export commonly used types at crate root
pub use config::{
    Layout, LayoutFile, PaneSpec, SessionSpec, SizeConstraint, SplitDirection, expand_path,
    generate_layout_file, load_layout_file,
};
pub use error::{ProvisionError, ProvisionStep};
pub use provision::provision;
pub use tmux::{Multiplexer, TmuxControl};
