//! # Skelly Terminal
//!
//! Command-line inspector for the Skelly marketplace data:
//!
//! - `skelly holdings <address> [--json]` - NFTs held by any account, with
//!   marketplace activity
//! - `skelly collections [--json]` - the known collection registry
//! - `skelly network [--json]` - the target chain descriptor
//!
//! Configuration comes from `SKELLY_*` environment variables (a `.env` file
//! is loaded first); see [`lib_core::config`].

pub mod cli;
pub mod commands;
pub mod debug;

pub use cli::{Cli, Command};
