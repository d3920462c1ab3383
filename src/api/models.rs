//! Response models for the public game-data API
//!
//! Epoch-second timestamps are decoded into `DateTime<Utc>`.

use chrono::serde::{ts_seconds, ts_seconds_option};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::JsonValue;

// ============================================================================
// Players
// ============================================================================

/// Player profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// API URL of the profile
    #[serde(rename = "@id", default)]
    pub id: String,
    /// Public profile URL
    #[serde(default)]
    pub url: String,
    pub username: String,
    pub player_id: u64,
    pub title: Option<String>,
    /// Account status (`basic`, `premium`, `closed`, ...)
    pub status: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub location: Option<String>,
    /// API URL of the player's country
    #[serde(rename = "country")]
    pub country_url: String,
    #[serde(with = "ts_seconds")]
    pub joined: DateTime<Utc>,
    #[serde(with = "ts_seconds")]
    pub last_online: DateTime<Utc>,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub is_streamer: bool,
    pub twitch_url: Option<String>,
    pub fide: Option<u32>,
}

impl Player {
    /// ISO code of the player's country, taken from the country URL
    pub fn country_code(&self) -> Option<&str> {
        self.country_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|code| !code.is_empty())
    }
}

/// Rating statistics per game type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub chess_daily: Option<GameTypeStats>,
    pub chess_rapid: Option<GameTypeStats>,
    pub chess_bullet: Option<GameTypeStats>,
    pub chess_blitz: Option<GameTypeStats>,
    pub chess960_daily: Option<GameTypeStats>,
    pub tactics: Option<RatingExtremes>,
    pub lessons: Option<RatingExtremes>,
    pub puzzle_rush: Option<JsonValue>,
    pub fide: Option<u32>,
}

/// Ratings and record for one game type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameTypeStats {
    pub last: Option<RatingRecord>,
    pub best: Option<RatingRecord>,
    pub record: Option<Record>,
}

/// A rating at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub rating: u32,
    #[serde(with = "ts_seconds")]
    pub date: DateTime<Utc>,
    /// Glicko rating deviation
    pub rd: Option<u32>,
    /// Game in which a best rating was reached
    pub game: Option<String>,
}

/// Highest and lowest ratings (tactics, lessons)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingExtremes {
    pub highest: Option<RatingRecord>,
    pub lowest: Option<RatingRecord>,
}

/// Win/loss/draw record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub win: u32,
    #[serde(default)]
    pub loss: u32,
    #[serde(default)]
    pub draw: u32,
    pub time_per_move: Option<u64>,
    pub timeout_percent: Option<f64>,
}

impl Record {
    /// Total games in the record
    pub fn games(&self) -> u32 {
        self.win + self.loss + self.draw
    }
}


/// Club membership listed on a player's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerClub {
    /// API URL of the club
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, with = "ts_seconds_option")]
    pub joined: Option<DateTime<Utc>>,
    #[serde(default, with = "ts_seconds_option")]
    pub last_activity: Option<DateTime<Utc>>,
}

/// Team matches a player took part in, grouped by state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerMatches {
    #[serde(default)]
    pub finished: Vec<PlayerMatch>,
    #[serde(default)]
    pub in_progress: Vec<PlayerMatch>,
    #[serde(default)]
    pub registered: Vec<PlayerMatch>,
}

/// One team match from a player's point of view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMatch {
    /// API URL of the match
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: String,
    /// API URL of the club the player represented
    #[serde(default)]
    pub club: String,
    /// API URL of the player's board, once boards are assigned
    pub board: Option<String>,
    pub results: Option<MatchResult>,
}

/// Player's result on each color of a match board
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub played_as_white: Option<String>,
    pub played_as_black: Option<String>,
}

/// Tournaments a player entered, grouped by state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerTournaments {
    #[serde(default)]
    pub finished: Vec<PlayerTournament>,
    #[serde(default)]
    pub in_progress: Vec<PlayerTournament>,
    #[serde(default)]
    pub registered: Vec<PlayerTournament>,
}

/// One tournament entry; standings are only present once finished
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerTournament {
    /// API URL of the tournament
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub status: String,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub draws: Option<u32>,
    pub points_awarded: Option<f64>,
    pub placement: Option<u32>,
    pub total_players: Option<u32>,
}

// ============================================================================
// Games
// ============================================================================

/// A finished game from a monthly archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub url: String,
    #[serde(default)]
    pub pgn: String,
    pub time_control: String,
    #[serde(default, with = "ts_seconds_option")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, with = "ts_seconds_option")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default = "default_rated")]
    pub rated: bool,
    pub accuracies: Option<Accuracies>,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub fen: String,
    pub time_class: String,
    pub rules: String,
    pub white: GamePlayer,
    pub black: GamePlayer,
    pub eco: Option<String>,
    pub tournament: Option<String>,
    #[serde(rename = "match")]
    pub match_url: Option<String>,
}

fn default_rated() -> bool {
    true
}

impl Game {
    /// The side `username` played, compared case-insensitively
    pub fn side_of(&self, username: &str) -> Option<&GamePlayer> {
        [&self.white, &self.black]
            .into_iter()
            .find(|p| p.username.eq_ignore_ascii_case(username))
    }
}

/// One side of a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamePlayer {
    pub rating: u32,
    /// `win`, `checkmated`, `resigned`, `timeout`, ...
    pub result: String,
    /// API URL of the player's profile
    #[serde(rename = "@id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub uuid: String,
}

/// Computer accuracy per side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Accuracies {
    pub white: f64,
    pub black: f64,
}


/// An ongoing daily game
///
/// Unlike archived games, the sides are plain profile URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentGame {
    pub url: String,
    /// API URL of the white player
    pub white: String,
    /// API URL of the black player
    pub black: String,
    /// `white` or `black`
    #[serde(default)]
    pub turn: String,
    #[serde(default)]
    pub fen: String,
    #[serde(default)]
    pub pgn: String,
    #[serde(default)]
    pub time_control: String,
    #[serde(default)]
    pub time_class: String,
    #[serde(default)]
    pub rules: String,
    #[serde(default = "default_rated")]
    pub rated: bool,
    #[serde(default, with = "ts_seconds_option")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, with = "ts_seconds_option")]
    pub last_activity: Option<DateTime<Utc>>,
    #[serde(default, with = "ts_seconds_option")]
    pub move_by: Option<DateTime<Utc>>,
}

/// A daily game waiting on the player's move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToMoveGame {
    pub url: String,
    /// The epoch when a draw offer is pending and no move is due
    #[serde(default, with = "ts_seconds_option")]
    pub move_by: Option<DateTime<Utc>>,
    #[serde(default, with = "ts_seconds_option")]
    pub last_activity: Option<DateTime<Utc>>,
    #[serde(default)]
    pub draw_offer: bool,
}

// ============================================================================
// Clubs, countries, puzzles
// ============================================================================

/// Club profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    #[serde(rename = "@id", default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub club_id: u64,
    #[serde(default)]
    pub icon: String,
    /// API URL of the club's country
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub average_daily_rating: u32,
    #[serde(default)]
    pub members_count: u32,
    #[serde(default, with = "ts_seconds_option")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, with = "ts_seconds_option")]
    pub last_activity: Option<DateTime<Utc>>,
    #[serde(default)]
    pub visibility: String,
    #[serde(default)]
    pub join_request: String,
    /// API URLs of the club admins
    #[serde(default)]
    pub admin: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
}

/// Club members grouped by activity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubMembers {
    #[serde(default)]
    pub weekly: Vec<ClubMember>,
    #[serde(default)]
    pub monthly: Vec<ClubMember>,
    #[serde(default)]
    pub all_time: Vec<ClubMember>,
}

impl ClubMembers {
    /// Every member regardless of activity
    pub fn len(&self) -> usize {
        self.weekly.len() + self.monthly.len() + self.all_time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubMember {
    pub username: String,
    #[serde(default, with = "ts_seconds_option")]
    pub joined: Option<DateTime<Utc>>,
}

/// Team matches of a club, grouped by state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClubMatches {
    #[serde(default)]
    pub finished: Vec<ClubMatch>,
    #[serde(default)]
    pub in_progress: Vec<ClubMatch>,
    #[serde(default)]
    pub registered: Vec<ClubMatch>,
}

/// One team match from a club's point of view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubMatch {
    /// API URL of the match
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    /// API URL of the opposing club
    #[serde(default)]
    pub opponent: String,
    #[serde(default)]
    pub time_class: String,
    #[serde(default, with = "ts_seconds_option")]
    pub start_time: Option<DateTime<Utc>>,
    /// `win`, `lose` or `draw` for finished matches
    pub result: Option<String>,
}

/// Country profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    #[serde(rename = "@id", default)]
    pub id: String,
    pub code: String,
    pub name: String,
}

/// Daily or random puzzle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPuzzle {
    pub title: String,
    pub url: String,
    #[serde(with = "ts_seconds")]
    pub publish_time: DateTime<Utc>,
    pub fen: String,
    pub pgn: String,
    pub image: String,
}

// ============================================================================
// Tournaments and team matches
// ============================================================================

/// Tournament overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub name: String,
    #[serde(default)]
    pub url: String,
    pub description: Option<String>,
    #[serde(default)]
    pub creator: String,
    /// `registration`, `in_progress` or `finished`
    pub status: String,
    #[serde(default, with = "ts_seconds_option")]
    pub finish_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub settings: JsonValue,
    #[serde(default)]
    pub players: Vec<TournamentPlayer>,
    /// API URLs of the rounds
    #[serde(default)]
    pub rounds: Vec<String>,
}

/// A player's standing in a tournament, round or group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentPlayer {
    pub username: String,
    pub status: Option<String>,
    pub points: Option<f64>,
    pub tie_break: Option<f64>,
    pub is_advancing: Option<bool>,
}

/// One tournament round
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TournamentRound {
    /// API URLs of the round's groups
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub players: Vec<TournamentPlayer>,
}

/// One group of a tournament round
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TournamentGroup {
    #[serde(default)]
    pub fair_play_removals: Vec<String>,
    #[serde(default)]
    pub games: Vec<Game>,
    #[serde(default)]
    pub players: Vec<TournamentPlayer>,
}

/// Team match overview (daily or live)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMatch {
    /// API URL of the match
    #[serde(rename = "@id", default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: String,
    pub description: Option<String>,
    #[serde(default, with = "ts_seconds_option")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, with = "ts_seconds_option")]
    pub end_time: Option<DateTime<Utc>>,
    pub status: String,
    /// Number of boards
    #[serde(default)]
    pub boards: u32,
    #[serde(default)]
    pub settings: JsonValue,
    #[serde(default)]
    pub teams: JsonValue,
}

/// One board of a team match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchBoard {
    /// Points per username on this board
    #[serde(default)]
    pub board_scores: HashMap<String, f64>,
    #[serde(default)]
    pub games: Vec<Game>,
}

// ============================================================================
// Streamers and leaderboards
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streamer {
    pub username: String,
    #[serde(default)]
    pub avatar: String,
    pub twitch_url: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub is_live: bool,
    #[serde(default)]
    pub is_community_streamer: bool,
    #[serde(default)]
    pub platforms: Vec<StreamPlatform>,
}

/// A channel a streamer broadcasts on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamPlatform {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub stream_url: String,
    #[serde(default)]
    pub channel_url: String,
    #[serde(default)]
    pub is_live: bool,
    #[serde(default)]
    pub is_main_live_platform: bool,
}

/// Top players per category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboards {
    #[serde(default)]
    pub daily: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub daily960: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub live_rapid: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub live_blitz: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub live_bullet: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub live_bughouse: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub live_blitz960: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub live_threecheck: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub live_crazyhouse: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub live_kingofthehill: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub lessons: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub tactics: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_id: u64,
    pub username: String,
    pub score: i64,
    pub rank: u32,
    #[serde(default)]
    pub url: String,
    pub title: Option<String>,
}

// ============================================================================
// Envelopes
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct ArchivesEnvelope {
    pub archives: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GamesEnvelope {
    pub games: Vec<Game>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlayersEnvelope {
    pub players: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentGamesEnvelope {
    pub games: Vec<CurrentGame>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ToMoveEnvelope {
    pub games: Vec<ToMoveGame>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlayerClubsEnvelope {
    #[serde(default)]
    pub clubs: Vec<PlayerClub>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClubsEnvelope {
    pub clubs: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StreamersEnvelope {
    #[serde(default)]
    pub streamers: Vec<Streamer>,
}
