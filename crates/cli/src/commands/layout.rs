//! Layout file commands for trellis.
//!
//! `init` generates a starter layout file; `show` prints a resolved layout
//! without touching tmux.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use trellis_core::{generate_layout_file, load_layout_file};

/// Generate a starter trellis.yaml in the current directory.
pub fn init_layout_file() -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let path = current_dir.join("trellis.yaml");

    if path.exists() {
        eprintln!("{}", "trellis.yaml already exists in this directory".red());
        std::process::exit(1);
    }

    // Session name defaults to the directory name
    let session = current_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "trellis".to_string());

    std::fs::write(&path, generate_layout_file(&session))?;

    println!(
        "{} {} trellis.yaml (session: {})",
        "✔".green(),
        "Created".dimmed(),
        session.blue()
    );
    println!(
        "  {} edit the layout, then run '{}'",
        "next:".dimmed(),
        "trellis".blue()
    );

    Ok(())
}

/// Print the resolved layout, as JSON or a plain pane listing.
pub fn show_layout(layout_path: &Path, layout_name: Option<&str>, json: bool) -> Result<()> {
    let file = load_layout_file(layout_path)?;
    let spec = file.resolve(layout_name, None)?;
    spec.validate()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&spec)?);
        return Ok(());
    }

    println!(
        "{} {} ({} panes)",
        spec.name.blue(),
        spec.window
            .as_deref()
            .map(|w| format!("window: {}", w))
            .unwrap_or_default()
            .dimmed(),
        spec.panes.len()
    );

    for (index, pane) in spec.panes.iter().enumerate() {
        let shape = match pane.split {
            Some(direction) => {
                let target = pane.target.map(|t| t.to_string()).unwrap_or_else(|| {
                    format!("{} (previous)", index - 1)
                });
                let size = pane
                    .size
                    .map(|s| format!(", size {}", s))
                    .unwrap_or_default();
                format!("{:?} split of pane {}{}", direction, target, size).to_lowercase()
            }
            None => "root".to_string(),
        };

        let dir = pane
            .dir
            .as_deref()
            .map(|d| format!("  dir={}", d))
            .unwrap_or_default();
        let command = pane
            .command
            .as_deref()
            .map(|c| format!("  $ {}", c))
            .unwrap_or_default();

        println!(
            "  {} {}{}{}",
            format!("pane {}", index).blue(),
            shape.dimmed(),
            dir.dimmed(),
            command
        );
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
