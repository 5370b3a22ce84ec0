// src/pipeline/game.rs

//! Game-log pipeline.
//!
//! Two stages per week: the schedule page yields box-score URLs, then each
//! box score yields category tables. Box scores are handled in page order
//! and all categories of one box score finish before the next is fetched.

use std::collections::BTreeMap;

use crate::models::{Category, FetchRequest, OutputTarget, RunReport, Sheet, StatTable, Value};
use crate::services::{PageDocuments, PageLocator, default_season_weeks, parser};
use crate::services::fetcher::Transport;
use crate::storage::PathResolver;
use crate::utils::log as banner;

use super::{CONTEXT_COLUMNS, Pipeline};

/// Sheets keyed by category, emitted in category order.
type Sheets = BTreeMap<Category, Sheet>;

impl<T: Transport> Pipeline<T> {
    /// Download every week of `year` (or only `week`) and write its stats.
    pub async fn run_game_log(
        &mut self,
        year: u32,
        week: Option<u32>,
        out: &PathResolver,
        report: &mut RunReport,
    ) {
        banner::header(&format!("Game log {year}"));

        let requests = self.resolve_weeks(year, week).await;
        let total = requests.len();
        for (i, request) in requests.iter().enumerate() {
            banner::step(i + 1, total, &request.to_string());
            if let FetchRequest::Week { year, week } = *request {
                self.run_week(request, year, week, out, report).await;
            }
        }
    }

    /// Week requests, in order of precedence: an explicit week, the
    /// configured season length, the weeks linked from the season page,
    /// then the historical default for the year.
    async fn resolve_weeks(&mut self, year: u32, week: Option<u32>) -> Vec<FetchRequest> {
        if let Some(week) = week {
            return PageLocator::week_requests(year, [week]);
        }
        if let Some(weeks) = self.season_weeks {
            return PageLocator::week_requests(year, 1..=weeks);
        }

        let url = self.locator.season_url(year);
        match self.fetch(&url).await {
            Ok(page) => match self.extractor.week_numbers(&page) {
                Ok(weeks) if !weeks.is_empty() => {
                    log::info!("Season {year} lists {} weeks", weeks.len());
                    return PageLocator::week_requests(year, weeks);
                }
                Ok(_) => log::warn!("No week links on {url}"),
                Err(err) => log::warn!("Could not read weeks from {url}: {err}"),
            },
            Err(err) => log::warn!("Could not fetch season page {url}: {err}"),
        }

        let weeks = default_season_weeks(year);
        log::info!("Assuming {weeks} weeks for {year}");
        PageLocator::week_requests(year, 1..=weeks)
    }

    async fn run_week(
        &mut self,
        request: &FetchRequest,
        year: u32,
        week: u32,
        out: &PathResolver,
        report: &mut RunReport,
    ) {
        let url = self.locator.url_for(request);
        let Some(schedule) = self.fetch_target(&url, report).await else {
            return;
        };

        let box_scores = match self.extractor.box_score_urls(&schedule) {
            Ok(urls) => urls,
            Err(err) => {
                log::warn!("Skipping {url}: {err}");
                report.fail(&url, err);
                return;
            }
        };
        report.succeed(&url);

        if box_scores.is_empty() {
            log::info!("No box scores for {year} week {week}");
            return;
        }
        banner::sub_item(&format!("{} box scores", box_scores.len()));

        let mut week_sheets = Sheets::new();
        for box_score in &box_scores {
            let Some(sheets) = self.run_box_score(year, week, box_score, out, report).await else {
                continue;
            };
            if self.split_by_game {
                continue;
            }
            for (category, sheet) in sheets {
                merge(&mut week_sheets, category, sheet);
            }
        }

        for (category, sheet) in &week_sheets {
            self.write(out, &OutputTarget::week(year, week, *category), sheet, report)
                .await;
        }
    }

    /// Fetch and parse one box score. In split mode its files are written
    /// here; otherwise its sheets are handed back for the week.
    async fn run_box_score(
        &mut self,
        year: u32,
        week: u32,
        url: &str,
        out: &PathResolver,
        report: &mut RunReport,
    ) -> Option<Sheets> {
        let page = self.fetch_target(url, report).await?;
        let docs = PageDocuments::parse(&page.body);

        let tables = match self.extractor.extract(&docs, &page.url) {
            Ok(tables) => tables,
            Err(err) => {
                log::warn!("Skipping {url}: {err}");
                report.fail(url, err);
                return None;
            }
        };
        let Some(game_id) = self.extractor.game_id(&docs, &page.url) else {
            log::warn!("Skipping {url}: no game id");
            report.fail(url, "no game id in page or URL");
            return None;
        };

        let context = [
            ("year", Value::from(year)),
            ("week", Value::from(week)),
            ("game_id", Value::from(game_id.as_str())),
        ];
        let mut sheets = Sheets::new();
        for table in &tables {
            merge(&mut sheets, table.category, game_sheet(table, &context));
        }
        banner::sub_item(&format!(
            "{game_id}: {}",
            sheets
                .iter()
                .map(|(c, s)| format!("{c} {}", s.len()))
                .collect::<Vec<_>>()
                .join(", ")
        ));

        if self.split_by_game {
            for (category, sheet) in &sheets {
                let target = OutputTarget::game(year, week, game_id.as_str(), *category);
                self.write(out, &target, sheet, report).await;
            }
        }
        report.succeed(url);
        Some(sheets)
    }
}

/// A table's records with context columns, seeded with the full header so
/// a table without data rows still produces a header line. Table columns
/// named like a context column are suffixed, never merged into it.
fn game_sheet(table: &StatTable, context: &[(&str, Value)]) -> Sheet {
    let columns: Vec<String> = CONTEXT_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(
            table
                .header()
                .map(|header| parser::column_names_reserving(&CONTEXT_COLUMNS, header))
                .unwrap_or_default(),
        )
        .collect();

    let mut sheet = Sheet::with_header(columns.as_slice());
    sheet.extend(
        parser::parse_reserving(table, &CONTEXT_COLUMNS)
            .into_iter()
            .map(|record| record.with_context(context)),
    );
    sheet
}

fn merge(sheets: &mut Sheets, category: Category, sheet: Sheet) {
    match sheets.get_mut(&category) {
        Some(existing) => existing.append(sheet),
        None => {
            sheets.insert(category, sheet);
        }
    }
}
