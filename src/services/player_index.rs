//! Player index shard parsing.
//!
//! A shard page lists one player per paragraph:
//!
//! ```text
//! <p><b><a href="/players/M/MahoPa00.htm">Patrick Mahomes</a></b> (QB) 2017-2024</p>
//! <p><a href="/players/M/MaasJo00.htm">Joe Maas</a> (G) 1954-1955</p>
//! ```
//!
//! Bold entries are active players.

use regex::Regex;
use scraper::ElementRef;

use crate::error::{AppError, Result};
use crate::models::{Category, RawPage, StatTable};
use crate::services::extractor::PageDocuments;
use crate::utils::{element_text, normalize_whitespace, selector};

/// Regexes used to pick apart one index entry.
struct EntryPatterns {
    id: Regex,
    position: Regex,
    years: Regex,
}

impl EntryPatterns {
    fn new() -> Result<Self> {
        let compile = |p: &str| Regex::new(p).map_err(|e| AppError::parse("player entry pattern", e));
        Ok(Self {
            id: compile(r"/players/[A-Za-z]/([^/.]+)\.htm")?,
            position: compile(r"\(([^)]*)\)")?,
            years: compile(r"(\d{4})\s*-\s*(\d{4})")?,
        })
    }
}

/// Extract the player list of one shard page as a `Players` table.
///
/// The returned table starts with a synthesized header row. Paragraphs
/// without a player link are not entries and are skipped.
pub fn player_table(page: &RawPage) -> Result<StatTable> {
    let docs = PageDocuments::parse(&page.body);
    let container = selector("#div_players")?;
    if docs.first(&container).is_none() {
        return Err(AppError::parse(&page.url, "no player list on page"));
    }

    let patterns = EntryPatterns::new()?;
    let entry_sel = selector("#div_players p")?;
    let link_sel = selector("a[href]")?;
    let bold_sel = selector("b, strong")?;

    let header = Category::Players
        .known_columns()
        .iter()
        .map(|c| c.to_string())
        .collect();
    let mut rows = vec![header];

    for entry in docs.select(&entry_sel) {
        match parse_entry(&entry, &patterns, &link_sel, &bold_sel) {
            Some(row) => rows.push(row),
            None => log::debug!("Skipping non-player entry on {}: {}", page.url, element_text(&entry)),
        }
    }

    Ok(StatTable::new(Category::Players, rows))
}

fn parse_entry(
    entry: &ElementRef,
    patterns: &EntryPatterns,
    link_sel: &scraper::Selector,
    bold_sel: &scraper::Selector,
) -> Option<Vec<String>> {
    let link = entry.select(link_sel).next()?;
    let name = element_text(&link);
    if name.is_empty() {
        return None;
    }

    let player_id = link
        .value()
        .attr("href")
        .and_then(|href| patterns.id.captures(href))
        .and_then(|caps| caps.get(1))
        .map_or(String::new(), |m| m.as_str().to_string());

    let full = element_text(entry);
    let rest = normalize_whitespace(&full.replacen(&name, "", 1));

    let position = patterns
        .position
        .captures(&rest)
        .and_then(|caps| caps.get(1))
        .map_or(String::new(), |m| m.as_str().trim().to_string());

    let (start, end) = patterns
        .years
        .captures(&rest)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .unwrap_or_default();

    let active = entry.select(bold_sel).next().is_some();

    Some(vec![
        name,
        position,
        start,
        end,
        active.to_string(),
        player_id,
    ])
}
