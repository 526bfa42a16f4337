use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fpl_dashboard::aggregate::Aggregator;
use fpl_dashboard::api::state::AppState;
use fpl_dashboard::api::{build_router, RouterOptions};
use fpl_dashboard::config::AppConfig;
use fpl_dashboard::fetch::{Fetcher, FetcherConfig};
use fpl_dashboard::fpl::FplClient;
use fpl_dashboard::models::{EntryId, Gameweek, LeagueId};
use fpl_dashboard::parse_duration;

#[derive(Parser)]
#[command(name = "fpl-dashboard")]
#[command(about = "Fantasy Premier League league dashboard backend")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./fpl-dashboard.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Upstream request timeout (e.g., "10s", "1m")
    #[arg(long)]
    timeout: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,

        /// Log all HTTP requests
        #[arg(long)]
        access_log: bool,
    },

    /// Classic league standings with one gameweek's scores
    Standings {
        #[arg(long)]
        league: u64,

        #[arg(long)]
        gameweek: u32,
    },

    /// Top scorers of every configured division
    TopScorers {
        #[arg(long)]
        gameweek: u32,
    },

    /// Break a tie between two entries
    Tie {
        #[arg(long)]
        team1: u64,

        #[arg(long)]
        team2: u64,

        #[arg(long)]
        gameweek: u32,
    },

    /// Print the current gameweek
    Gameweek,

    /// Predicted price changes
    Prices,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    if let Some(raw) = &cli.timeout {
        let timeout = parse_duration(raw)
            .filter(|d| d.as_secs() > 0)
            .with_context(|| format!("invalid --timeout: {}", raw))?;
        config.upstream.timeout_seconds = timeout.as_secs();
    }

    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    init_tracing(&level, cli.json_logs);

    tracing::info!("Starting fpl-dashboard v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Upstream {} ({}s timeout), {} divisions",
        config.upstream.base_url,
        config.upstream.timeout_seconds,
        config.divisions.len()
    );

    let fetcher = Fetcher::new(FetcherConfig::from(&config.upstream))
        .context("creating upstream HTTP client")?;
    let aggregator = Aggregator::new(Arc::new(FplClient::new(fetcher)), config.division_table())
        .with_upstream_config(&config.upstream);

    match cli.command {
        Commands::Serve {
            host,
            port,
            access_log,
        } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let options = RouterOptions {
                cors_origins: config.server.cors_origins.clone(),
                access_log,
                static_dir: config.server.static_dir.as_ref().map(PathBuf::from),
            };

            let app = build_router(AppState::new(aggregator), &options);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("binding {}", addr))?;
            tracing::info!("Dashboard API: http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Standings { league, gameweek } => {
            let standings = aggregator
                .aggregate_classic_standings(LeagueId(league), Gameweek(gameweek))
                .await?;
            print_json(&standings)?;
        }
        Commands::TopScorers { gameweek } => {
            let table = aggregator.top_scorers_by_division(Gameweek(gameweek)).await;
            print_json(&table)?;
        }
        Commands::Tie {
            team1,
            team2,
            gameweek,
        } => {
            let analysis = aggregator
                .analyze_tie(EntryId(team1), EntryId(team2), Gameweek(gameweek))
                .await?;
            print_json(&analysis)?;
        }
        Commands::Gameweek => {
            let gameweek = aggregator.current_gameweek().await?;
            print_json(&serde_json::json!({ "gameweek": gameweek }))?;
        }
        Commands::Prices => {
            let predictions = aggregator.price_change_predictions().await?;
            print_json(&predictions)?;
        }
    }

    Ok(())
}
