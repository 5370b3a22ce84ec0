//! pfr-scrape CLI
//!
//! Local execution entry point.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use pfr_scrape::{
    error::{AppError, Result},
    models::{Config, Mode, RunRequest},
    pipeline::Pipeline,
    services::ReqwestTransport,
    storage::{LocalCsvSink, ensure_writable},
};

/// pfr-scrape - Pro Football Reference stats downloader
#[derive(Parser, Debug)]
#[command(
    name = "pfr-scrape",
    version,
    about = "Download box-score and player index tables as CSV"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "pfr.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// What to download
    #[arg(long, value_enum, default_value_t = ModeArg::Game)]
    mode: ModeArg,

    /// Season year (game mode)
    #[arg(long)]
    year: Option<u32>,

    /// Only this week of the season
    #[arg(long)]
    week: Option<u32>,

    /// Root directory for CSV output
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Minimum delay between requests, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Number of regular-season weeks
    #[arg(long)]
    weeks: Option<u32>,

    /// Write one file per box score instead of one per week
    #[arg(long)]
    split_by_game: bool,

    /// Write the run report as JSON to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Game,
    Player,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Game => Mode::Game,
            ModeArg::Player => Mode::Player,
        }
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Apply command-line overrides on top of the loaded configuration.
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(delay) = cli.delay_ms {
        config.crawler.request_delay_ms = delay;
    }
    if let Some(weeks) = cli.weeks {
        config.season.weeks = Some(weeks);
    }
    if cli.split_by_game {
        config.output.split_by_game = true;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    apply_overrides(&mut config, &cli);
    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    let request = RunRequest {
        mode: cli.mode.into(),
        year: cli.year,
        week: cli.week,
        output_dir: cli.output_dir.clone(),
    };
    if request.mode == Mode::Game && request.year.is_none() {
        return Err(AppError::validation("--year is required with --mode game"));
    }
    ensure_writable(&request.output_dir).await?;

    log::info!(
        "Writing to {} with a {} ms request delay",
        request.output_dir.display(),
        config.crawler.request_delay_ms
    );

    let transport = ReqwestTransport::new(&config.crawler)?;
    let mut pipeline = Pipeline::new(&config, transport, Arc::new(LocalCsvSink::new()))?;
    let report = pipeline.run(&request).await?;

    if let Some(path) = &cli.report {
        let json = serde_json::to_vec_pretty(&report)?;
        tokio::fs::write(path, json).await?;
        log::info!("Report saved to {}", path.display());
    }

    if report.all_failed() {
        return Err(AppError::fetch(
            request.output_dir.display().to_string(),
            "every request in the run failed",
        ));
    }
    Ok(())
}
