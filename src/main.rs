use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, NaiveTime, Utc};
use clap::{Parser, Subcommand};

use daylog::observer::{PlatformIdleProbe, PlatformObserver};
use daylog::{Database, SessionManager, TrackerConfig, TrackerController};

#[derive(Parser)]
#[command(name = "daylog")]
#[command(version)]
#[command(about = "Foreground activity tracker: app, web, and call sessions", long_about = None)]
struct Cli {
    /// Path to the SQLite database (defaults to the platform data dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the tracker until Ctrl-C
    Start,

    /// Show the database path, settings, and today's activity
    Status,

    /// Print the resolved configuration as JSON
    Config,

    /// Write a setting (polling_interval_ms, idle_timeout_seconds, privacy_mode)
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let db_path = cli.db.unwrap_or_else(default_db_path);
    let db = Database::new(db_path)?;

    match cli.command {
        Commands::Start => cmd_start(db).await,
        Commands::Status => cmd_status(db).await,
        Commands::Config => cmd_config(db).await,
        Commands::Set { key, value } => cmd_set(db, &key, &value).await,
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("daylog")
        .join("activity.db")
}

async fn cmd_start(db: Database) -> Result<()> {
    log::info!("daylog starting up...");
    let config = TrackerConfig::load(&db).await;

    let manager = SessionManager::new(db.clone(), config.privacy_mode);
    let observer = Arc::new(PlatformObserver::new());
    let probe = Arc::new(PlatformIdleProbe::new());

    let mut controller = TrackerController::new();
    controller.start(config, manager, observer, probe)?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    log::info!("Shutting down...");
    controller.stop().await
}

async fn cmd_status(db: Database) -> Result<()> {
    println!("daylog status");
    println!("database: {}", db.path().display());
    println!();

    println!("settings:");
    for (key, value) in db.all_settings().await? {
        println!("  {key} = {value}");
    }
    println!();

    let now = Utc::now();
    let sessions = db
        .sessions_started_between(local_day_start(now), now)
        .await?;
    let total_seconds: i64 = sessions.iter().map(|s| s.active_seconds).sum();
    println!(
        "today: {} session(s), {} active",
        sessions.len(),
        format_duration(total_seconds)
    );
    Ok(())
}

async fn cmd_config(db: Database) -> Result<()> {
    let config = TrackerConfig::load(&db).await;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

async fn cmd_set(db: Database, key: &str, value: &str) -> Result<()> {
    validate_setting(key, value)?;
    db.set_setting(key, value).await?;
    println!("{key} = {value}");
    Ok(())
}

fn validate_setting(key: &str, value: &str) -> Result<()> {
    match key {
        "polling_interval_ms" | "idle_timeout_seconds" => {
            let parsed: u64 = value
                .parse()
                .with_context(|| format!("{key} must be a positive integer"))?;
            if parsed == 0 {
                bail!("{key} must be greater than 0");
            }
            Ok(())
        }
        "privacy_mode" => match value {
            "true" | "false" => Ok(()),
            _ => bail!("privacy_mode must be \"true\" or \"false\""),
        },
        _ => bail!(
            "unknown setting {key} (valid: polling_interval_ms, idle_timeout_seconds, privacy_mode)"
        ),
    }
}

/// Midnight of the local calendar day, in UTC. Falls back to a 24h window
/// when the local midnight does not exist (DST edge).
fn local_day_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.with_timezone(&Local)
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_local_timezone(Local)
        .earliest()
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(|| now - chrono::Duration::hours(24))
}

fn format_duration(total_seconds: i64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_numeric_settings() {
        assert!(validate_setting("polling_interval_ms", "500").is_ok());
        assert!(validate_setting("polling_interval_ms", "0").is_err());
        assert!(validate_setting("idle_timeout_seconds", "90").is_ok());
        assert!(validate_setting("idle_timeout_seconds", "soon").is_err());
    }

    #[test]
    fn validates_privacy_mode_as_boolean() {
        assert!(validate_setting("privacy_mode", "true").is_ok());
        assert!(validate_setting("privacy_mode", "false").is_ok());
        assert!(validate_setting("privacy_mode", "1").is_err());
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(validate_setting("polling", "100").is_err());
    }

    #[test]
    fn formats_durations_for_humans() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(61), "1m 1s");
        assert_eq!(format_duration(7260), "2h 1m");
    }

    #[test]
    fn day_start_is_not_after_now() {
        let now = Utc::now();
        let start = local_day_start(now);
        assert!(start <= now);
        assert!(now - start <= chrono::Duration::hours(27));
    }
}
