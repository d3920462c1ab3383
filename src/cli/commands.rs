//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rate-limited client for the public game-data API
#[derive(Parser, Debug)]
#[command(name = "chesscom")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a player profile
    Player {
        /// Player username
        username: String,
    },

    /// Show a player's rating statistics
    Stats {
        /// Player username
        username: String,
    },

    /// List a player's monthly game archives
    Archives {
        /// Player username
        username: String,
    },

    /// List a player's games for one month
    Games {
        /// Player username
        username: String,
        /// Year (e.g. 2024)
        year: i32,
        /// Month (1-12)
        month: u32,
    },

    /// Download a player's games for one month as PGN
    Pgn {
        /// Player username
        username: String,
        /// Year (e.g. 2024)
        year: i32,
        /// Month (1-12)
        month: u32,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List usernames holding a title
    Titled {
        /// Title abbreviation (GM, IM, FM, WGM, ...)
        title: String,
    },

    /// Show a club profile
    Club {
        /// Club URL id (e.g. chess-com-developer-community)
        url_id: String,
        /// List the club's members instead
        #[arg(long)]
        members: bool,
    },

    /// Show a country profile
    Country {
        /// ISO 3166 country code
        code: String,
        /// List the country's players instead
        #[arg(long)]
        players: bool,
    },

    /// List streamers
    Streamers,

    /// Show the leaderboards
    Leaderboards,

    /// Show the daily puzzle
    Puzzle {
        /// Show a random puzzle instead
        #[arg(long)]
        random: bool,
    },

    /// Fetch any API path as JSON
    Get {
        /// Path under the base URL (e.g. /titled/GM)
        path: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON (one document per line)
    Json,
    /// Indented JSON
    Pretty,
}
