mod error;
mod removal;
mod terminal;

use std::path::PathBuf;

use chrono::{Local, TimeZone};
use clap::{Parser, Subcommand, ValueEnum};
use grants::RunConfig;
use runtime::{ApplicationEngine, LaunchReason, WindowEvent, WindowId};
use storage::{GrantStore, SqliteGrantStore};
use tokio::sync::mpsc;
use tracing::{Level, info};

use error::{Error, Result};
use removal::ManifestRegistry;
use terminal::TerminalPrompt;

const DB_FILE: &str = "permissions.db";

#[derive(Parser)]
#[command(name = "ctpm-installer")]
#[command(about = "Apply a click-to-play permission manifest once, then remove it", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the manifest's permissions and remove the manifest
    Run {
        /// Installer manifest (TOML)
        #[arg(short, long)]
        manifest: PathBuf,
        /// Grant database (defaults to the data directory)
        #[arg(long)]
        db: Option<PathBuf>,
        /// Why the installer is being launched
        #[arg(short, long, value_enum, default_value = "enable")]
        reason: Reason,
    },
    /// List stored grants
    Grants {
        /// Grant database (defaults to the data directory)
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Reason {
    /// The host is starting and no window is open yet
    Startup,
    /// The host is already running
    Enable,
}

impl From<Reason> for LaunchReason {
    fn from(reason: Reason) -> Self {
        match reason {
            Reason::Startup => LaunchReason::AppStartup,
            Reason::Enable => LaunchReason::Enable,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            manifest,
            db,
            reason,
        } => cmd_run(manifest, db, reason.into()).await,
        Commands::Grants { db } => cmd_grants(db),
    }
}

async fn cmd_run(manifest: PathBuf, db: Option<PathBuf>, reason: LaunchReason) -> Result<()> {
    let config = RunConfig::load(&manifest)?;

    let db_path = match db {
        Some(path) => path,
        None => {
            let data_dir = dirs_data_dir().unwrap_or_else(|| ".ctpm".into());
            std::fs::create_dir_all(&data_dir)?;
            data_dir.join(DB_FILE)
        }
    };
    let store = SqliteGrantStore::open(&db_path)?;
    info!(db = %db_path.display(), entries = config.permissions.len(), "manifest loaded");

    let prompt = TerminalPrompt::stdio();
    let registry = ManifestRegistry::new(config.component_id(), &manifest);
    let engine = ApplicationEngine::new(&config, &store, &prompt, &registry);

    let mut events = terminal_window_events();
    let report = runtime::launch(&engine, reason, &mut events).await;

    println!(
        "{} grant(s) written, {} error(s), installer {}",
        report.written.len(),
        report.errors.len(),
        if report.removed { "removed" } else { "NOT removed" }
    );
    Ok(())
}

/// The terminal is the only window; it is open and loaded as soon as the
/// process is attached to it.
fn terminal_window_events() -> mpsc::Receiver<WindowEvent> {
    let (tx, rx) = mpsc::channel(2);
    tokio::spawn(async move {
        let terminal = WindowId(0);
        if tx.send(WindowEvent::Opened(terminal)).await.is_ok() {
            let _ = tx.send(WindowEvent::Loaded(terminal)).await;
        }
    });
    rx
}

fn cmd_grants(db: Option<PathBuf>) -> Result<()> {
    let db_path = db
        .or_else(|| dirs_data_dir().map(|d| d.join(DB_FILE)))
        .unwrap_or_else(|| PathBuf::from(".ctpm").join(DB_FILE));

    if !db_path.exists() {
        return Err(Error::DatabaseNotFound { path: db_path });
    }

    let store = SqliteGrantStore::open(&db_path)?;
    let grants = store.list()?;

    if grants.is_empty() {
        println!("No grants found.");
        return Ok(());
    }

    println!("{:<40}  {:<32}  {:<6}  MODIFIED", "ORIGIN", "GRANT", "VALUE");
    println!("{}", "-".repeat(100));

    for grant in grants {
        let modified = Local
            .from_utc_datetime(&grant.modified_at.naive_utc())
            .format("%Y-%m-%d %H:%M");
        println!(
            "{:<40}  {:<32}  {:<6}  {modified}",
            grant.origin,
            grant.key,
            format!("{:?}", grant.permission).to_lowercase()
        );
    }

    Ok(())
}

fn dirs_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/share/ctpm"))
    }
    #[cfg(target_os = "linux")]
    {
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/share")))
            .map(|p| p.join("ctpm"))
    }
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|h| PathBuf::from(h).join("ctpm"))
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_defaults_to_enable() {
        let cli = Cli::try_parse_from(["ctpm-installer", "run", "--manifest", "m.toml"]).unwrap();
        let Commands::Run { reason, .. } = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(LaunchReason::from(reason), LaunchReason::Enable);
    }

    #[test]
    fn startup_reason_waits_for_window() {
        let cli = Cli::try_parse_from([
            "ctpm-installer",
            "run",
            "--manifest",
            "m.toml",
            "--reason",
            "startup",
        ])
        .unwrap();
        let Commands::Run { reason, .. } = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(LaunchReason::from(reason), LaunchReason::AppStartup);
    }

    #[test]
    fn unknown_reason_is_rejected() {
        assert!(Cli::try_parse_from([
            "ctpm-installer",
            "run",
            "--manifest",
            "m.toml",
            "--reason",
            "upgrade",
        ])
        .is_err());
    }

    #[tokio::test]
    async fn bad_manifest_fails_setup_and_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("installer.toml");
        std::fs::write(&manifest, "[[permissions]]\ndomain = 3\n").unwrap();
        let db = dir.path().join(DB_FILE);

        let err = cmd_run(manifest.clone(), Some(db.clone()), LaunchReason::Enable)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Manifest(_)));
        assert!(manifest.exists());
        assert!(!db.exists());
    }
}
