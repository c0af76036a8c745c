//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::domain::TreeSortType;

/// Navigable table of contents for digitized documents
#[derive(Parser, Debug)]
#[command(name = "navtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Sub-collection to open when the document is a collection
    #[arg(long, global = true)]
    pub collection_index: Option<usize>,

    /// Manifest to open within the selected collection
    #[arg(long, global = true)]
    pub manifest_index: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the navigation tree
    Tree {
        /// Structure document (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Tree ordering: none | date
        #[arg(short, long)]
        sort: Option<TreeSortType>,
        /// Top range used as root for manifests
        #[arg(short, long)]
        top_range: Option<usize>,
    },

    /// Print the tree in pre-order, one node per line
    Flatten {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[arg(short, long)]
        sort: Option<TreeSortType>,
    },

    /// Show the next node with canvases after a node id
    Next {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Current node id
        id: String,
        #[arg(short, long)]
        sort: Option<TreeSortType>,
    },

    /// Show the node preceding a node id
    Previous {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Current node id
        id: String,
        #[arg(short, long)]
        sort: Option<TreeSortType>,
    },

    /// List the ranges containing a canvas
    Ranges {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        canvas_id: String,
    },

    /// Parse the region of an `xywh=` selector
    Rect {
        selector: String,
        /// Matched text of the hit
        #[arg(long)]
        chars: Option<String>,
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
    Show {
        /// Directory whose .navtree.toml is layered in
        #[arg(value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
    },
    /// Print a commented config template
    Template,
    /// Show config file locations
    Path,
}
