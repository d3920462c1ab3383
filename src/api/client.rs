//! Typed client for the public game-data API

use super::models::{
    ArchivesEnvelope, Club, ClubMatches, ClubMembers, ClubsEnvelope, Country, CurrentGame,
    CurrentGamesEnvelope, DailyPuzzle, Game, GamesEnvelope, Leaderboards, MatchBoard, Player,
    PlayerClub, PlayerClubsEnvelope, PlayerMatches, PlayerStats, PlayerTournaments,
    PlayersEnvelope, Streamer, StreamersEnvelope, TeamMatch, ToMoveEnvelope, ToMoveGame,
    Tournament, TournamentGroup, TournamentRound,
};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{
    ApiRequest, AttemptObserver, RateLimiter, RequestExecutor, ReqwestTransport,
};
use crate::types::JsonValue;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// Client for the public game-data REST API.
///
/// Every call goes through one [`RequestExecutor`], so rate limiting and
/// retries apply uniformly. Clients built with
/// [`with_rate_limiter`](Self::with_rate_limiter) and clones of one limiter
/// share a single quota.
#[derive(Debug)]
pub struct ChessComClient {
    executor: RequestExecutor,
}

impl ChessComClient {
    /// Create a client with the default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default())
    }

    /// Create a client from configuration, with its own rate limiter
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        let limiter = config
            .rate_limiter_config()
            .map(|limiter_config| RateLimiter::new(&limiter_config));
        Self::build(config, limiter)
    }

    /// Create a client that gates requests through a shared limiter
    pub fn with_rate_limiter(config: &ClientConfig, limiter: RateLimiter) -> Result<Self> {
        Self::build(config, Some(limiter))
    }

    /// Wrap an existing executor
    pub fn from_executor(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    fn build(config: &ClientConfig, limiter: Option<RateLimiter>) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::from_config(config)?;

        let mut executor = RequestExecutor::new(Arc::new(transport))
            .with_policy(config.retry_policy())
            .with_timeout(config.timeout());
        if let Some(limiter) = limiter {
            executor = executor.with_rate_limiter(limiter);
        }

        debug!(
            "Created API client for {} (rate limit: {:?})",
            config.base_url, config.rate_limit
        );
        Ok(Self { executor })
    }

    /// Register an attempt observer
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn AttemptObserver>) -> Self {
        self.executor = self.executor.with_observer(observer);
        self
    }

    /// The underlying request executor
    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    // ------------------------------------------------------------------------
    // Players
    // ------------------------------------------------------------------------

    /// Get a player's profile
    pub async fn get_player(&self, username: &str) -> Result<Player> {
        let username = segment("username", username)?;
        self.fetch(format!("/player/{username}")).await
    }

    /// Get a player's rating statistics
    pub async fn get_player_stats(&self, username: &str) -> Result<PlayerStats> {
        let username = segment("username", username)?;
        self.fetch(format!("/player/{username}/stats")).await
    }

    /// Get a player's ongoing daily games
    pub async fn get_player_current_games(&self, username: &str) -> Result<Vec<CurrentGame>> {
        let username = segment("username", username)?;
        let envelope: CurrentGamesEnvelope =
            self.fetch(format!("/player/{username}/games")).await?;
        Ok(envelope.games)
    }

    /// Get a player's daily games where it is their move
    pub async fn get_player_to_move_games(&self, username: &str) -> Result<Vec<ToMoveGame>> {
        let username = segment("username", username)?;
        let envelope: ToMoveEnvelope = self
            .fetch(format!("/player/{username}/games/to-move"))
            .await?;
        Ok(envelope.games)
    }

    /// Get the URLs of a player's monthly game archives
    pub async fn get_player_game_archives(&self, username: &str) -> Result<Vec<String>> {
        let username = segment("username", username)?;
        let envelope: ArchivesEnvelope = self
            .fetch(format!("/player/{username}/games/archives"))
            .await?;
        Ok(envelope.archives)
    }

    /// Get a player's games for one month
    pub async fn get_archived_games(
        &self,
        username: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<Game>> {
        let path = archive_path(username, year, month)?;
        let envelope: GamesEnvelope = self.fetch(path).await?;
        Ok(envelope.games)
    }

    /// Download a player's games for one month as multi-game PGN
    pub async fn download_archived_games_pgn(
        &self,
        username: &str,
        year: i32,
        month: u32,
    ) -> Result<Bytes> {
        let path = format!("{}/pgn", archive_path(username, year, month)?);
        let request = ApiRequest::get(path).header("Accept", "application/x-chess-pgn");
        let response = self.executor.execute(&request).await?;
        Ok(response.into_body())
    }

    /// Get the clubs a player belongs to
    pub async fn get_player_clubs(&self, username: &str) -> Result<Vec<PlayerClub>> {
        let username = segment("username", username)?;
        let envelope: PlayerClubsEnvelope =
            self.fetch(format!("/player/{username}/clubs")).await?;
        Ok(envelope.clubs)
    }

    /// Get a player's team matches
    pub async fn get_player_matches(&self, username: &str) -> Result<PlayerMatches> {
        let username = segment("username", username)?;
        self.fetch(format!("/player/{username}/matches")).await
    }

    /// Get a player's tournaments
    pub async fn get_player_tournaments(&self, username: &str) -> Result<PlayerTournaments> {
        let username = segment("username", username)?;
        self.fetch(format!("/player/{username}/tournaments")).await
    }

    /// Get usernames holding a title (`GM`, `IM`, `WGM`, ...)
    pub async fn get_titled_players(&self, title: &str) -> Result<Vec<String>> {
        let title = segment("title", title)?.to_ascii_uppercase();
        let envelope: PlayersEnvelope = self.fetch(format!("/titled/{title}")).await?;
        Ok(envelope.players)
    }

    // ------------------------------------------------------------------------
    // Clubs and countries
    // ------------------------------------------------------------------------

    /// Get a club by its URL id
    pub async fn get_club(&self, url_id: &str) -> Result<Club> {
        let url_id = segment("club id", url_id)?;
        self.fetch(format!("/club/{url_id}")).await
    }

    /// Get a club's members grouped by activity
    pub async fn get_club_members(&self, url_id: &str) -> Result<ClubMembers> {
        let url_id = segment("club id", url_id)?;
        self.fetch(format!("/club/{url_id}/members")).await
    }

    /// Get a club's team matches
    pub async fn get_club_matches(&self, url_id: &str) -> Result<ClubMatches> {
        let url_id = segment("club id", url_id)?;
        self.fetch(format!("/club/{url_id}/matches")).await
    }

    /// Get a country by ISO 3166 code
    pub async fn get_country(&self, iso_code: &str) -> Result<Country> {
        let iso_code = country_code(iso_code)?;
        self.fetch(format!("/country/{iso_code}")).await
    }

    /// Get usernames of players registered in a country
    pub async fn get_country_players(&self, iso_code: &str) -> Result<Vec<String>> {
        let iso_code = country_code(iso_code)?;
        let envelope: PlayersEnvelope =
            self.fetch(format!("/country/{iso_code}/players")).await?;
        Ok(envelope.players)
    }

    /// Get API URLs of clubs registered in a country
    pub async fn get_country_clubs(&self, iso_code: &str) -> Result<Vec<String>> {
        let iso_code = country_code(iso_code)?;
        let envelope: ClubsEnvelope = self.fetch(format!("/country/{iso_code}/clubs")).await?;
        Ok(envelope.clubs)
    }

    // ------------------------------------------------------------------------
    // Tournaments and team matches
    // ------------------------------------------------------------------------

    /// Get a tournament by its URL id
    pub async fn get_tournament(&self, url_id: &str) -> Result<Tournament> {
        let url_id = segment("tournament id", url_id)?;
        self.fetch(format!("/tournament/{url_id}")).await
    }

    /// Get one round of a tournament
    pub async fn get_tournament_round(&self, url_id: &str, round: u32) -> Result<TournamentRound> {
        let url_id = segment("tournament id", url_id)?;
        self.fetch(format!("/tournament/{url_id}/{round}")).await
    }

    /// Get one group of a tournament round
    pub async fn get_tournament_round_group(
        &self,
        url_id: &str,
        round: u32,
        group: u32,
    ) -> Result<TournamentGroup> {
        let url_id = segment("tournament id", url_id)?;
        self.fetch(format!("/tournament/{url_id}/{round}/{group}"))
            .await
    }

    /// Get a daily team match
    pub async fn get_match(&self, match_id: u64) -> Result<TeamMatch> {
        self.fetch(format!("/match/{match_id}")).await
    }

    /// Get one board of a daily team match
    pub async fn get_match_board(&self, match_id: u64, board: u32) -> Result<MatchBoard> {
        self.fetch(format!("/match/{match_id}/{board}")).await
    }

    /// Get a live team match
    pub async fn get_live_match(&self, match_id: u64) -> Result<TeamMatch> {
        self.fetch(format!("/match/live/{match_id}")).await
    }

    /// Get one board of a live team match
    pub async fn get_live_match_board(&self, match_id: u64, board: u32) -> Result<MatchBoard> {
        self.fetch(format!("/match/live/{match_id}/{board}")).await
    }

    // ------------------------------------------------------------------------
    // Puzzles
    // ------------------------------------------------------------------------

    /// Get today's puzzle
    pub async fn get_daily_puzzle(&self) -> Result<DailyPuzzle> {
        self.fetch("/puzzle".to_string()).await
    }

    /// Get a random puzzle
    pub async fn get_random_puzzle(&self) -> Result<DailyPuzzle> {
        self.fetch("/puzzle/random".to_string()).await
    }

    // ------------------------------------------------------------------------
    // Streamers and leaderboards
    // ------------------------------------------------------------------------

    /// Get streamers registered with the site
    pub async fn get_streamers(&self) -> Result<Vec<Streamer>> {
        let envelope: StreamersEnvelope = self.fetch("/streamers".to_string()).await?;
        Ok(envelope.streamers)
    }

    /// Get the top players in each category
    pub async fn get_leaderboards(&self) -> Result<Leaderboards> {
        self.fetch("/leaderboards".to_string()).await
    }

    // ------------------------------------------------------------------------
    // Generic
    // ------------------------------------------------------------------------

    /// Fetch any path under the base URL as untyped JSON
    pub async fn get_json(&self, path: &str) -> Result<JsonValue> {
        let path = path.trim();
        if path.is_empty() {
            return Err(Error::validation("path cannot be empty"));
        }
        self.fetch(path.to_string()).await
    }

    async fn fetch<T: DeserializeOwned>(&self, path: String) -> Result<T> {
        self.executor.execute_json(&ApiRequest::get(path)).await
    }
}

/// Validate one path segment, lowercasing it
fn segment(name: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::validation(format!("{name} cannot be empty")));
    }
    if value.contains(['/', '?', '#']) {
        return Err(Error::validation(format!(
            "{name} '{value}' contains reserved characters"
        )));
    }
    Ok(value.to_ascii_lowercase())
}

fn country_code(value: &str) -> Result<String> {
    Ok(segment("country code", value)?.to_ascii_uppercase())
}

fn archive_path(username: &str, year: i32, month: u32) -> Result<String> {
    let username = segment("username", username)?;
    if !(1..=12).contains(&month) {
        return Err(Error::validation(format!(
            "month must be between 1 and 12, got {month}"
        )));
    }
    if !(2000..=9999).contains(&year) {
        return Err(Error::validation(format!("year {year} is out of range")));
    }
    Ok(format!("/player/{username}/games/{year}/{month:02}"))
}
