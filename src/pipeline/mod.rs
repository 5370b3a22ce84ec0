//! Pipeline entry points.
//!
//! - `game`: season → weeks → box scores → category CSVs
//! - `players`: player index shards A–Z → one `players` CSV
//!
//! A [`Pipeline`] owns the single request stream of a run: the fetcher, the
//! rate limiter it is gated by, and the output sink. Output paths are rooted
//! at the request's output directory. Every failure scoped to one target is
//! logged, recorded in the [`RunReport`] and skipped.

pub mod game;
pub mod players;

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{Config, Mode, OutputTarget, RawPage, RunReport, RunRequest, Sheet};
use crate::services::{Clock, PageLocator, PoliteFetcher, RateLimiter, TableExtractor, Transport};
use crate::storage::{OutputSink, PathResolver};
use crate::utils::log as banner;

/// Context columns prefixed to every game-mode record.
pub const CONTEXT_COLUMNS: [&str; 3] = ["year", "week", "game_id"];

pub struct Pipeline<T> {
    fetcher: PoliteFetcher<T>,
    limiter: RateLimiter,
    locator: PageLocator,
    extractor: TableExtractor,
    sink: Arc<dyn OutputSink>,
    season_weeks: Option<u32>,
    split_by_game: bool,
}

impl<T: Transport> Pipeline<T> {
    pub fn new(config: &Config, transport: T, sink: Arc<dyn OutputSink>) -> Result<Self> {
        Ok(Self {
            fetcher: PoliteFetcher::new(transport, &config.crawler),
            limiter: RateLimiter::new(config.crawler.request_delay()),
            locator: PageLocator::new(&config.site.base_url)?,
            extractor: TableExtractor::new(&config.site.base_url, config.output.include_advanced)?,
            sink,
            season_weeks: config.season.weeks,
            split_by_game: config.output.split_by_game,
        })
    }

    /// Replace the limiter's clock, keeping its delay.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.limiter = RateLimiter::with_clock(self.limiter.delay(), clock);
        self
    }

    /// Run one top-level request to completion.
    ///
    /// Only a malformed request is an error; per-target failures end up in
    /// the returned report.
    pub async fn run(&mut self, request: &RunRequest) -> Result<RunReport> {
        let out = PathResolver::new(&request.output_dir);
        let mut report = RunReport::new();
        match request.mode {
            Mode::Game => {
                let year = request
                    .year
                    .ok_or_else(|| AppError::validation("a season year is required in game mode"))?;
                self.run_game_log(year, request.week, &out, &mut report).await;
            }
            Mode::Player => self.run_players(&out, &mut report).await,
        }
        report.finish();
        log_report(&report);
        Ok(report)
    }

    async fn fetch(&mut self, url: &str) -> Result<RawPage> {
        self.fetcher.fetch(&mut self.limiter, url).await
    }

    /// Record a per-target fetch outcome; returns the page on success.
    async fn fetch_target(&mut self, url: &str, report: &mut RunReport) -> Option<RawPage> {
        match self.fetch(url).await {
            Ok(page) => Some(page),
            Err(err) if err.is_not_found() => {
                log::warn!("Skipping {url}: not found");
                report.skip_not_found(url);
                None
            }
            Err(err) => {
                log::warn!("Skipping {url}: {err}");
                report.fail(url, err);
                None
            }
        }
    }

    async fn write(
        &self,
        out: &PathResolver,
        target: &OutputTarget,
        sheet: &Sheet,
        report: &mut RunReport,
    ) {
        let path = out.resolve(target);
        match self.sink.write(&path, sheet).await {
            Ok(()) => report.wrote(path),
            Err(err) => {
                log::error!("Failed to write {}: {}", path.display(), err);
                report.fail(path.display().to_string(), err);
            }
        }
    }
}

/// Log the end-of-run summary block.
pub fn log_report(report: &RunReport) {
    let elapsed = report
        .finished_at
        .map(|end| (end - report.started_at).num_seconds())
        .unwrap_or_default();
    banner::summary(
        "Run complete",
        &[
            ("Succeeded", report.succeeded.len().to_string()),
            ("Not found", report.not_found.len().to_string()),
            ("Failed", report.failed.len().to_string()),
            ("Files written", report.files_written.len().to_string()),
            ("Elapsed", format!("{elapsed}s")),
        ],
    );
    for failure in &report.failed {
        log::warn!("Failed: {} ({})", failure.target, failure.reason);
    }
}
