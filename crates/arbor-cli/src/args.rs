use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{AssignCommands, IdArgs, NodeCommands, ProjectCommands, TreeArgs};

/// Arbor: a work breakdown structure engine
///
/// Break a project down into at most four levels of work. Codes, progress
/// roll-up and delay tracking are maintained for you. Run `serve` to expose
/// the same operations over MCP (Model Context Protocol) on stdio.
#[derive(Parser)]
#[command(version, about, name = "arbor")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/arbor/arbor.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage projects
    #[command(alias = "p")]
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Manage nodes within a project
    #[command(alias = "n")]
    Node {
        #[command(subcommand)]
        command: NodeCommands,
    },
    /// Show a project's tree
    #[command(alias = "t")]
    Tree(TreeArgs),
    /// Manage who is assigned to a node
    #[command(alias = "a")]
    Assign {
        #[command(subcommand)]
        command: AssignCommands,
    },
    /// List delayed leaves of a project
    #[command(alias = "d")]
    Delayed(IdArgs),
    /// Start the MCP server
    Serve,
}
