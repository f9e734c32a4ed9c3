//! Root CLI structure for skelanim

use clap::{Parser, Subcommand};

use crate::commands::{info::InfoArgs, simulate::SimulateArgs, tree::TreeArgs};

#[derive(Parser)]
#[command(name = "skelanim")]
#[command(about = "Inspect and play skeletal animation rigs", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the bones and clips of a rig
    Info(InfoArgs),

    /// Display the bone hierarchy of a rig as a tree
    Tree(TreeArgs),

    /// Run the animation controller over a rig for a number of frames
    Simulate(SimulateArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
