// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dockhand")]
#[command(about = "Declarative container reconciliation for Docker hosts")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new dockhand.yml manifest
    Init {
        /// Name for the template's container
        #[arg(short, long)]
        name: Option<String>,

        /// Image for the template's container
        #[arg(short, long)]
        image: Option<String>,

        /// Overwrite an existing manifest
        #[arg(long)]
        force: bool,
    },

    /// Create and start everything the manifest declares
    Up {
        /// Manifest path (default: discover in the current directory)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Stop and remove every manifest container
    Down {
        /// Manifest path (default: discover in the current directory)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Show the daemon's view of each manifest container
    Status {
        /// Manifest path (default: discover in the current directory)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Pull every image the manifest references
    Pull {
        /// Manifest path (default: discover in the current directory)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Run a privileged setup command on a remote machine over SSH
    Setup {
        /// Remote host to connect to
        host: String,

        /// Command to run under `sudo sh -c`
        command: String,

        /// SSH user
        #[arg(short, long, default_value = "docker")]
        user: String,

        /// SSH port
        #[arg(short, long, default_value_t = 22)]
        port: u16,

        /// Path to the private key file
        #[arg(short, long)]
        key: Option<PathBuf>,

        /// Accept and record unknown host keys
        #[arg(long)]
        trust: bool,

        /// Path to the known_hosts file
        #[arg(long)]
        known_hosts: Option<PathBuf>,
    },
}
