//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lxns_core::NamespaceKind;

#[derive(Parser)]
#[command(name = "lxns")]
#[command(about = "Inspect, create and join Linux namespaces", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the namespaces of a process
    Info {
        /// Process ID (default: current process)
        #[arg(short, long)]
        pid: Option<i32>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a command in new namespaces
    Unshare {
        /// Namespace kinds to create, comma separated (e.g. user,mnt,uts)
        #[arg(short, long = "ns", value_delimiter = ',', required_unless_present = "all")]
        namespaces: Vec<NamespaceKind>,

        /// Create every namespace kind
        #[arg(long, conflicts_with = "namespaces")]
        all: bool,

        /// Command to run (default: $SHELL or /bin/sh)
        #[arg(last = true)]
        command: Vec<String>,
    },

    /// Run a command in all namespaces of another process
    Join {
        /// Target process ID
        #[arg(short, long)]
        pid: i32,

        /// Command to run (default: $SHELL or /bin/sh)
        #[arg(last = true)]
        command: Vec<String>,
    },

    /// Bind-mount a path into the mount namespace of another process
    Bind {
        /// Target process ID
        #[arg(short, long)]
        pid: i32,

        /// Clone submounts too
        #[arg(short, long)]
        recursive: bool,

        /// Source path, resolved in the current mount namespace
        source: PathBuf,

        /// Mount point, resolved from the root of the target's mount namespace
        target: PathBuf,
    },

    /// Show the per-user-namespace limits of each namespace kind
    Limits {
        /// New limit for the kinds given with --kind
        #[arg(long, requires = "kinds")]
        set: Option<u64>,

        /// Restrict to these kinds, comma separated
        #[arg(short, long = "kind", value_delimiter = ',')]
        kinds: Vec<NamespaceKind>,
    },
}
