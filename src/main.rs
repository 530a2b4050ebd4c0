use analytics::{AnalyticsEngine, DurationBoundaries, FilterCriteria};
use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use configuration::ServerOverrides;
use core_types::{Session, SessionKind};
use database::{DbRepository, MemoryStore, SessionStore};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod tables;

/// The main entry point for the MaxVariance session analytics application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Held until exit so buffered log lines reach the file.
    let _guard = init_tracing();

    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "No .env file loaded.");
    }

    let mut settings = configuration::load_config_from(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => {
            settings.apply_overrides(&args.server);
            match args.sessions_file {
                Some(path) => {
                    let sessions = read_sessions(&path)?;
                    tracing::info!(sessions = sessions.len(), file = %path.display(), "Serving sessions from file.");
                    web_server::run_server(&settings, MemoryStore::from_sessions(sessions)).await
                }
                None => {
                    let pool = database::connect(&settings.database).await?;
                    database::run_migrations(&pool).await?;
                    web_server::run_server(&settings, DbRepository::new(pool)).await
                }
            }
        }
        Commands::Report(args) => {
            let engine = AnalyticsEngine::new(&settings.analytics)?;
            handle_report(args, &engine)
        }
        Commands::Backup(args) => {
            let pool = database::connect(&settings.database).await?;
            handle_backup(args, &DbRepository::new(pool)).await
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Poker session analytics: an HTTP API and offline reports.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file. Missing files fall back to defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON API.
    Serve(ServeArgs),
    /// Print statistics for a JSON export of sessions.
    Report(ReportArgs),
    /// Export every stored session to a timestamped JSON file.
    Backup(BackupArgs),
}

#[derive(Parser)]
struct ServeArgs {
    #[command(flatten)]
    server: ServerOverrides,

    /// Serve sessions from a JSON file in memory instead of the database.
    #[arg(long)]
    sessions_file: Option<PathBuf>,
}

#[derive(Parser)]
struct ReportArgs {
    /// JSON array of sessions.
    #[arg(long)]
    file: PathBuf,

    /// Earliest date to include (format: YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Latest date to include (format: YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Only "cash" or only "tournament" sessions.
    #[arg(long = "type")]
    kind: Option<SessionKind>,

    #[arg(long)]
    stakes: Option<String>,

    #[arg(long)]
    game_type: Option<String>,

    /// Comma-separated duration bucket bounds in minutes, e.g. "0,60,120".
    #[arg(long)]
    buckets: Option<String>,

    /// Rolling window for the trend line.
    #[arg(long, allow_hyphen_values = true)]
    window: Option<i64>,

    /// Print the full report as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct BackupArgs {
    /// Directory the export is written to. Created if missing.
    #[arg(long, default_value = "backups")]
    out: PathBuf,
}

// ==============================================================================
// Setup
// ==============================================================================

/// Logs to stderr and to a daily rolling file under `logs/`. Stdout is left
/// for report output.
fn init_tracing() -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily("logs", "maxvariance.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();

    guard
}

fn read_sessions(path: &Path) -> anyhow::Result<Vec<Session>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let sessions: Vec<Session> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of sessions", path.display()))?;
    Ok(sessions)
}

// ==============================================================================
// Report Command Logic
// ==============================================================================

fn handle_report(args: ReportArgs, engine: &AnalyticsEngine) -> anyhow::Result<()> {
    let sessions = read_sessions(&args.file)?;
    let criteria = FilterCriteria {
        from: args.from,
        to: args.to,
        kind: args.kind,
        stakes: args.stakes,
        game_type: args.game_type,
    };

    let filtered = engine.filter(&sessions, &criteria);
    tracing::info!(
        total = sessions.len(),
        filtered = filtered.len(),
        "Building report."
    );

    let boundaries = args.buckets.as_deref().map(DurationBoundaries::parse_list);
    let report = engine.report(&filtered, boundaries.as_deref(), args.window);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        tables::print_report(&report);
    }
    Ok(())
}

// ==============================================================================
// Backup Command Logic
// ==============================================================================

async fn handle_backup<S: SessionStore>(args: BackupArgs, store: &S) -> anyhow::Result<()> {
    let sessions = store.fetch_all().await?;
    let path = write_backup(&args.out, &sessions, Utc::now())?;
    tracing::info!(sessions = sessions.len(), file = %path.display(), "Backup written.");
    println!("{}", path.display());
    Ok(())
}

/// Writes `sessions-backup-<timestamp>.json` into `dir` in the format
/// `read_sessions` accepts, and returns its path.
fn write_backup(dir: &Path, sessions: &[Session], at: DateTime<Utc>) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let path = dir.join(format!(
        "sessions-backup-{}.json",
        at.format("%Y-%m-%dT%H-%M-%S-%3fZ")
    ));
    std::fs::write(&path, serde_json::to_string_pretty(sessions)?)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn stored_sessions() -> Vec<Session> {
        serde_json::from_value(json!([
            {
                "date": "2024-03-01", "type": "cash", "stakes": "NL50", "gameType": "NLHE",
                "durationMinutes": 90, "profitUnits": 42.5, "profitMoney": 21.25,
                "handsPlayed": 200, "startTime": "20:15", "notes": "deep stacks"
            },
            {
                "date": "2024-02-20", "type": "tournament", "gameType": "MTT",
                "durationMinutes": 240, "buyIn": 22, "cashOut": 0, "location": "Online"
            }
        ]))
        .unwrap()
    }

    #[tokio::test]
    async fn backup_round_trips_through_read_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let sessions = stored_sessions();
        let store = MemoryStore::from_sessions(sessions.clone());
        let out = dir.path().join("nested").join("backups");

        handle_backup(BackupArgs { out: out.clone() }, &store).await.unwrap();

        let files: Vec<PathBuf> = std::fs::read_dir(&out)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(files.len(), 1);

        let restored = read_sessions(&files[0]).unwrap();
        assert_eq!(restored, store.fetch_all().await.unwrap());
        assert_eq!(restored.len(), sessions.len());
        assert!(restored.iter().all(|s| !s.id.is_nil()));
    }

    #[test]
    fn backup_file_is_named_after_its_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let at = Utc.with_ymd_and_hms(2024, 7, 9, 18, 5, 3).unwrap();

        let path = write_backup(dir.path(), &[], at).unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "sessions-backup-2024-07-09T18-05-03-000Z.json"
        );
        assert!(read_sessions(&path).unwrap().is_empty());
    }
}
