//! CLI module
//!
//! Command-line interface for the API client.
//!
//! # Commands
//!
//! - `player` - Show a player profile
//! - `stats` - Show a player's ratings
//! - `archives` - List a player's monthly archives
//! - `games` - List a player's games for one month
//! - `pgn` - Download a month of games as PGN
//! - `puzzle` - Show the daily or a random puzzle
//! - `get` - Fetch any API path as JSON

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
