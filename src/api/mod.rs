//! API module
//!
//! Typed endpoints for the public game-data API, built on the
//! [`RequestExecutor`](crate::http::RequestExecutor).

mod client;
mod models;

pub use client::ChessComClient;
pub use models::{
    Accuracies, Club, ClubMatch, ClubMatches, ClubMember, ClubMembers, Country, CurrentGame,
    DailyPuzzle, Game, GamePlayer, GameTypeStats, LeaderboardEntry, Leaderboards, MatchBoard,
    MatchResult, Player, PlayerClub, PlayerMatch, PlayerMatches, PlayerStats, PlayerTournament,
    PlayerTournaments, RatingExtremes, RatingRecord, Record, StreamPlatform, Streamer,
    TeamMatch, ToMoveGame, Tournament, TournamentGroup, TournamentPlayer, TournamentRound,
};
