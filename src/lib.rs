// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::ref_option)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::float_cmp)]

//! # chesscom-api
//!
//! Async client for the public game-data REST API, with client-side rate
//! limiting and retries.
//!
//! ## Features
//!
//! - **Sliding-window rate limiting**: at most N requests per window, shared
//!   across every client holding the same limiter
//! - **Retries with backoff**: exponential backoff plus jitter for transient
//!   failures, server `Retry-After` hints honored for 429 responses
//! - **Typed endpoints**: players, games, clubs, tournaments, team matches,
//!   countries, puzzles, streamers, leaderboards
//! - **YAML configuration**: every knob has a default
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chesscom_api::{ChessComClient, ClientConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = ChessComClient::with_config(&ClientConfig::default())?;
//!
//!     let player = client.get_player("hikaru").await?;
//!     println!("{} joined {}", player.username, player.joined);
//!
//!     let games = client.get_archived_games("hikaru", 2024, 1).await?;
//!     println!("{} games", games.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   ChessComClient                     │
//! │  get_player  get_archived_games  get_club  ...       │
//! └──────────────────────────┬───────────────────────────┘
//!                            │
//! ┌──────────────────────────┴───────────────────────────┐
//! │                   RequestExecutor                    │
//! │  RateLimiter gate → Transport → classify → retry     │
//! └──────────┬──────────────┬──────────────┬─────────────┘
//!            │              │              │
//!      RateLimiter     RetryPolicy    AttemptObserver
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: document model fields before 1.0

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Common types and type aliases
pub mod types;

/// Static credentials
pub mod auth;

/// Rate limiting, retries and transport
pub mod http;

/// Client configuration
pub mod config;

/// Typed API endpoints and models
pub mod api;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{ApiError, Error, ErrorKind, FailureCause, Result};
pub use types::*;

// Re-export commonly used types
pub use api::ChessComClient;
pub use config::ClientConfig;
pub use http::{RateLimiter, RateLimiterConfig, RequestExecutor, RetryPolicy};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
