//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};
use uuid::Uuid;

/// Department hierarchy manager: build, query, mutate and flatten organizational trees
#[derive(Parser, Debug)]
#[command(name = "orgtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Department store file (overrides config)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub store: Option<PathBuf>,

    /// Additional config file
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new root department
    Init {
        /// Root title (default from config)
        title: Option<String>,
    },

    /// List every tree as flat records (parents first)
    List,

    /// Show hierarchy as tree
    Tree {
        /// Only the tree with this root id
        root: Option<Uuid>,
    },

    /// Show one department
    Show {
        /// Department id
        id: Uuid,
    },

    /// Add a department
    Add {
        /// Department title
        title: String,
        /// Parent department id (omit to create a new root)
        #[arg(short, long)]
        parent: Option<Uuid>,
    },

    /// Change a department title
    Rename {
        /// Department id
        id: Uuid,
        /// New title
        title: String,
    },

    /// Move a department (with its sub-departments) below another one
    Move {
        /// Department id
        id: Uuid,
        /// New parent department id
        #[arg(short, long)]
        parent: Uuid,
    },

    /// Delete a department
    Delete {
        /// Department id
        id: Uuid,
        /// Also delete all sub-departments
        #[arg(short, long)]
        force: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented template config
    Template,
    /// Print the global config file location
    Path,
}
