mod config;
mod count;
mod gcp;
mod report;
mod resource;

/// Version injected at compile time via GCPTALLY_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("GCPTALLY_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use config::Config;
use gcp::client::GcpClient;
use report::GcpInventory;
use std::io;
use std::path::PathBuf;
use tracing::Level;

/// Billable resource counter for GCP
#[derive(Parser, Debug)]
#[command(name = "gcptally", version, about, long_about = None)]
struct Args {
    /// Surface per-query diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Log level for the on-disk log file
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }

    fn from_config(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "off" => Some(LogLevel::Off),
            "error" => Some(LogLevel::Error),
            "warn" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

/// Install the tracing subscriber
///
/// Verbose mode writes diagnostics to stderr; otherwise an on-disk log file
/// is used when a level was selected. Quiet mode installs nothing, so
/// diagnostics are fully suppressed.
fn setup_logging(
    verbose: bool,
    file_level: LogLevel,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    if verbose {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_writer(io::stderr)
            .with_target(true)
            .with_ansi(false)
            .init();
        return None;
    }

    let tracing_level = file_level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .expect("Failed to open log file");

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("gcptally").join("gcptally.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".gcptally").join("gcptally.log");
    }
    PathBuf::from("gcptally.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load();

    let verbose = config.effective_verbose(args.verbose);
    let file_level = args
        .log_level
        .or_else(|| config.log_level.as_deref().and_then(LogLevel::from_config))
        .unwrap_or(LogLevel::Off);

    let _log_guard = setup_logging(verbose, file_level);

    tracing::info!("gcptally {} starting", VERSION);

    // Credentials are the single fatal precondition; everything after this
    // degrades to zero counts instead of failing.
    let client = GcpClient::new().await?;
    let inventory = GcpInventory::new(client);

    let stdout = io::stdout();
    report::run(&inventory, &mut stdout.lock()).await?;

    Ok(())
}
