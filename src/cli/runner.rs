//! CLI runner - executes commands

use crate::api::ChessComClient;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::TracingObserver;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
    config: ClientConfig,
}

impl Runner {
    /// Create a runner, loading the client configuration
    pub fn new(cli: Cli) -> Result<Self> {
        let config = match cli.config {
            Some(ref path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };
        Ok(Self { cli, config })
    }

    /// The loaded client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Level for the log subscriber
    pub fn log_level(&self) -> tracing::Level {
        if self.cli.verbose {
            tracing::Level::DEBUG
        } else {
            self.config.log_level.into()
        }
    }

    /// Build the API client described by the configuration
    pub fn build_client(&self) -> Result<ChessComClient> {
        let client = ChessComClient::with_config(&self.config)?;
        Ok(if self.cli.verbose {
            client.with_observer(Arc::new(TracingObserver))
        } else {
            client
        })
    }

    /// Run the CLI command, writing results to stdout
    pub async fn run(&self) -> Result<()> {
        let client = self.build_client()?;
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.execute(&client, &mut out).await
    }

    /// Run the CLI command against `client`, writing results to `out`
    pub async fn execute<W: Write>(&self, client: &ChessComClient, out: &mut W) -> Result<()> {
        debug!("Running {:?}", self.cli.command);
        match &self.cli.command {
            Commands::Player { username } => {
                let player = client.get_player(username).await?;
                self.output(out, &player)
            }
            Commands::Stats { username } => {
                let stats = client.get_player_stats(username).await?;
                self.output(out, &stats)
            }
            Commands::Archives { username } => {
                let archives = client.get_player_game_archives(username).await?;
                self.output(out, &archives)
            }
            Commands::Games {
                username,
                year,
                month,
            } => {
                let games = client.get_archived_games(username, *year, *month).await?;
                info!("Fetched {} games for {username} {year}-{month:02}", games.len());
                self.output(out, &games)
            }
            Commands::Pgn {
                username,
                year,
                month,
                output,
            } => {
                let pgn = client
                    .download_archived_games_pgn(username, *year, *month)
                    .await?;
                match output {
                    Some(path) => {
                        fs::write(path, &pgn)?;
                        info!("Wrote {} bytes to {}", pgn.len(), path.display());
                    }
                    None => out.write_all(&pgn)?,
                }
                Ok(())
            }
            Commands::Puzzle { random } => {
                let puzzle = if *random {
                    client.get_random_puzzle().await?
                } else {
                    client.get_daily_puzzle().await?
                };
                self.output(out, &puzzle)
            }
            Commands::Titled { title } => {
                let players = client.get_titled_players(title).await?;
                self.output(out, &players)
            }
            Commands::Club { url_id, members } => {
                if *members {
                    let members = client.get_club_members(url_id).await?;
                    self.output(out, &members)
                } else {
                    let club = client.get_club(url_id).await?;
                    self.output(out, &club)
                }
            }
            Commands::Country { code, players } => {
                if *players {
                    let players = client.get_country_players(code).await?;
                    self.output(out, &players)
                } else {
                    let country = client.get_country(code).await?;
                    self.output(out, &country)
                }
            }
            Commands::Streamers => {
                let streamers = client.get_streamers().await?;
                self.output(out, &streamers)
            }
            Commands::Leaderboards => {
                let leaderboards = client.get_leaderboards().await?;
                self.output(out, &leaderboards)
            }
            Commands::Get { path } => {
                let value = client.get_json(path).await?;
                self.output(out, &value)
            }
        }
    }

    fn output<W: Write, T: Serialize>(&self, out: &mut W, value: &T) -> Result<()> {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        writeln!(out, "{rendered}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write as _;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn runner_for(server: &MockServer, args: &[&str]) -> (Runner, tempfile::NamedTempFile) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url: {}\nrate_limit: null", server.uri()).unwrap();

        let mut argv = vec!["chesscom", "-C", file.path().to_str().unwrap()];
        argv.extend_from_slice(args);
        let runner = Runner::new(Cli::parse_from(argv)).unwrap();
        (runner, file)
    }

    #[tokio::test]
    async fn test_get_command_prints_json() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/titled/GM"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"players": ["a"]})))
            .mount(&mock_server)
            .await;

        let (runner, _file) = runner_for(&mock_server, &["get", "/titled/GM"]);
        let client = runner.build_client().unwrap();
        let mut out = Vec::new();
        runner.execute(&client, &mut out).await.unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "{\"players\":[\"a\"]}\n");
    }

    #[tokio::test]
    async fn test_titled_and_country_players_commands() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/titled/IM"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"players": ["b"]})))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/country/NO/players"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"players": ["magnuscarlsen"]})),
            )
            .mount(&mock_server)
            .await;

        let (runner, _file) = runner_for(&mock_server, &["titled", "im"]);
        let client = runner.build_client().unwrap();
        let mut out = Vec::new();
        runner.execute(&client, &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[\"b\"]\n");

        let (runner, _file) = runner_for(&mock_server, &["country", "no", "--players"]);
        let mut out = Vec::new();
        runner.execute(&client, &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[\"magnuscarlsen\"]\n");
    }

    #[tokio::test]
    async fn test_club_command() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/club/team-usa"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Team USA",
                "club_id": 7
            })))
            .mount(&mock_server)
            .await;

        let (runner, _file) = runner_for(&mock_server, &["--format", "pretty", "club", "team-usa"]);
        let client = runner.build_client().unwrap();
        let mut out = Vec::new();
        runner.execute(&client, &mut out).await.unwrap();

        let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed["name"], "Team USA");
        assert_eq!(printed["club_id"], 7);
    }

    #[tokio::test]
    async fn test_pgn_command_writes_file() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/player/hikaru/games/2024/01/pgn"))
            .respond_with(ResponseTemplate::new(200).set_body_string("1. e4 *\n"))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("games.pgn");
        let (runner, _file) = runner_for(
            &mock_server,
            &["pgn", "hikaru", "2024", "1", "-o", target.to_str().unwrap()],
        );
        let client = runner.build_client().unwrap();
        let mut out = Vec::new();
        runner.execute(&client, &mut out).await.unwrap();

        assert!(out.is_empty());
        assert_eq!(fs::read_to_string(&target).unwrap(), "1. e4 *\n");
    }

    #[tokio::test]
    async fn test_api_error_propagates() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/player/nobody"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let (runner, _file) = runner_for(&mock_server, &["player", "nobody"]);
        let client = runner.build_client().unwrap();
        let err = runner
            .execute(&client, &mut Vec::new())
            .await
            .unwrap_err();

        assert!(err.as_api().is_some_and(|e| e.is_not_found()));
    }

    #[test]
    fn test_log_level() {
        let quiet = Runner::new(Cli::parse_from(["chesscom", "puzzle"])).unwrap();
        assert_eq!(quiet.log_level(), tracing::Level::INFO);
        assert!(quiet.config().rate_limit.is_some());

        let verbose = Runner::new(Cli::parse_from(["chesscom", "-v", "puzzle"])).unwrap();
        assert_eq!(verbose.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli::parse_from(["chesscom", "-C", "/nonexistent/client.yaml", "puzzle"]);
        assert!(Runner::new(cli).is_err());
    }
}
