use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Provision tmux sessions from declarative layouts")]
#[command(version)]
pub struct Cli {
    /// Layout name to provision (from the layout file, default: "default")
    #[arg(value_name = "LAYOUT")]
    pub layout: Option<String>,

    /// Path to the layout file (default: ./trellis.yaml, searched upward)
    #[arg(short = 'f', long = "file", value_name = "PATH", global = true)]
    pub file: Option<String>,

    /// Override the session name from the layout file
    #[arg(short = 's', long = "session", value_name = "NAME")]
    pub session: Option<String>,

    /// Kill a session (uses the current tmux session if no name given)
    #[arg(
        short = 'k',
        long = "kill",
        value_name = "SESSION",
        num_args = 0..=1,
        default_missing_value = "",
        conflicts_with = "layout"
    )]
    pub kill: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a starter trellis.yaml in the current directory
    Init,

    /// List running trellis sessions
    #[command(visible_alias = "ls")]
    List {
        /// Include sessions not created by trellis
        #[arg(short = 'a', long = "all")]
        all: bool,
    },

    /// Print a resolved layout without provisioning it
    Show {
        /// Layout name (default: "default")
        #[arg(value_name = "LAYOUT")]
        layout: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
