//! Command-line arguments.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "skelly", version, about = "Inspect Skelly marketplace holdings on Fantom Opera")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// NFTs held by an account, flagged with marketplace activity
    Holdings {
        /// Account address (0x followed by 40 hex digits)
        address: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Known collection contracts
    Collections {
        #[arg(long)]
        json: bool,
    },

    /// Target network descriptor
    Network {
        #[arg(long)]
        json: bool,
    },
}
