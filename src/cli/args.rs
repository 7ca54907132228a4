//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::TraversalKind;

/// Build a multi-parent tree from parent:child links and query or edit it
#[derive(Parser, Debug)]
#[command(name = "rstree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file, layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Traversal used for lookups (default: from config)
    #[arg(short, long, value_enum, global = true)]
    pub traversal: Option<TraversalKind>,

    /// Parent/child link, repeatable
    #[arg(
        short,
        long = "link",
        value_name = "PARENT:CHILD",
        value_parser = parse_link,
        global = true
    )]
    pub links: Vec<(String, String)>,

    /// Root node id (default: parent of the first link)
    #[arg(short, long, global = true)]
    pub root: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List node ids in traversal order
    Nodes,

    /// Count nodes reachable from the root
    Size,

    /// Longest root-to-leaf path, counted in nodes
    Height,

    /// Show a node and its children
    Find {
        /// Node id
        id: String,
    },

    /// List the branch below a node, breadth-first
    Branch {
        /// Node id
        id: String,
    },

    /// Add a new node below PARENT
    Add {
        /// Id of the new node
        id: String,
        /// Parent node id
        parent: String,
    },

    /// Move a node below PARENT
    Move {
        /// Node id
        id: String,
        /// New parent node id
        parent: String,
        /// Move the whole branch instead of leaving children behind
        #[arg(short, long)]
        keep_children: bool,
    },

    /// Detach a node from its parents
    Remove {
        /// Node id
        id: String,
        /// Hand the first child over to the node's parents
        #[arg(short, long)]
        keep_children: bool,
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
    /// Show effective settings
    Show,
    /// Print a commented config template
    Template,
}

/// Parse `PARENT:CHILD`.
pub fn parse_link(s: &str) -> Result<(String, String), String> {
    let (parent, child) = s
        .split_once(':')
        .ok_or_else(|| format!("expected PARENT:CHILD, got '{s}'"))?;
    if parent.is_empty() || child.is_empty() {
        return Err(format!("empty id in link '{s}'"));
    }
    Ok((parent.to_string(), child.to_string()))
}
