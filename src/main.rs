//! # proc-peek - mini terminal process monitor
//!
//! Live process table with sorting, a detail panel and guarded process
//! termination, plus a one-shot `list` command for scripts.

mod app;
mod config;
pub mod constants;
mod coordinator;
mod list;
mod models;
mod monitor;
mod ui;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::Config;
use constants::*;
use models::SortKey;
use monitor::{SnapshotCollector, SysinfoProvider};
use ui::Theme;

/// proc-peek - mini process monitor. Run without a subcommand to launch the TUI.
#[derive(Parser, Debug)]
#[command(name = "proc-peek", version, about = "proc-peek - mini process monitor")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Initial sort key (cpu, memory, name, pid)
    #[arg(long, short = 's')]
    sort: Option<SortKey>,

    /// Process list refresh interval in milliseconds
    #[arg(long, short = 'i', value_name = "MS")]
    interval: Option<u64>,

    /// Color theme (default, gruvbox, nord, mono)
    #[arg(long, short = 't')]
    theme: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List top processes in the terminal (no interactive UI)
    List {
        /// Sort by: cpu, memory, name, pid
        #[arg(long, short = 's')]
        sort: Option<SortKey>,

        /// Number of processes to show
        #[arg(long, short = 'n')]
        count: Option<usize>,

        /// Print the records as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load and apply CLI overrides to config
    let mut config = Config::load();
    if let Some(key) = cli.sort {
        config.default_sort = key;
    }
    if let Some(ms) = cli.interval {
        config.process_refresh_ms = ms.max(MIN_REFRESH_MS);
    }
    if let Some(name) = cli.theme {
        if Theme::by_name(&name).is_some() {
            config.theme = name;
        } else {
            config.warnings.push(format!("unknown theme '{}'", name));
        }
    }

    let _guard = init_logging(&config.log_level)?;
    for warning in &config.warnings {
        warn!("config: {}", warning);
    }

    match cli.command {
        Some(Command::List { sort, count, json }) => {
            let key = sort.unwrap_or(config.default_sort);
            let count = count.unwrap_or(config.default_count);
            run_list(&config, key, count, json)
        }
        None => {
            info!(
                sort = %config.default_sort,
                process_ms = config.process_refresh_ms,
                system_ms = config.system_refresh_ms,
                "starting tui"
            );
            app::App::new(&config).run().await
        }
    }
}

/// One synchronous collection, printed to stdout.
fn run_list(config: &Config, key: SortKey, count: usize, json: bool) -> Result<()> {
    let mut collector = SnapshotCollector::new(SysinfoProvider::new(), config.disk_path.clone());
    let mut records = collector.collect_processes(key);
    records.truncate(count);
    info!(count = records.len(), sort = %key, "list printed");

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print!("{}", list::render_table(&records, key, count));
    }
    Ok(())
}

/// File logging: the TUI owns the terminal, so nothing goes to stdout.
/// RUST_LOG wins over the configured level.
fn init_logging(level: &str) -> Result<WorkerGuard> {
    let dir = data_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Ok(guard)
}
