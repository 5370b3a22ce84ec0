// src/services/extractor.rs

//! Table and link extraction from fetched pages.
//!
//! The source site ships many of its tables inside HTML comments and
//! un-hides them with script, so every page is searched twice: once as the
//! parsed document and once per comment that contains markup.

use std::collections::HashSet;

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Category, RawPage, StatTable};
use crate::utils::{element_text, resolve_url, selector};

/// A page plus every comment on it that hides markup.
pub struct PageDocuments {
    docs: Vec<Html>,
}

impl PageDocuments {
    pub fn parse(body: &str) -> Self {
        let main = Html::parse_document(body);
        let hidden: Vec<Html> = main
            .tree
            .root()
            .descendants()
            .filter_map(|node| match node.value() {
                Node::Comment(comment) if comment.comment.contains('<') => {
                    Some(Html::parse_fragment(&comment.comment))
                }
                _ => None,
            })
            .collect();

        let mut docs = Vec::with_capacity(hidden.len() + 1);
        docs.push(main);
        docs.extend(hidden);
        Self { docs }
    }

    /// Matches from the visible document first, then from comments, in
    /// document order.
    pub fn select<'a>(&'a self, sel: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.docs.iter().flat_map(move |doc| doc.select(sel))
    }

    pub fn first(&self, sel: &Selector) -> Option<ElementRef<'_>> {
        self.docs.iter().find_map(|doc| doc.select(sel).next())
    }
}

/// Locates category tables and navigation links on source pages.
#[derive(Debug, Clone)]
pub struct TableExtractor {
    base: Url,
    include_advanced: bool,
}

impl TableExtractor {
    pub fn new(base_url: &str, include_advanced: bool) -> Result<Self> {
        Ok(Self {
            base: Url::parse(base_url)?,
            include_advanced,
        })
    }

    /// Extract every category table present on a parsed box-score page.
    ///
    /// Optional categories are silently absent; a page with none of the
    /// core categories is a structural failure.
    pub fn extract(&self, docs: &PageDocuments, url: &str) -> Result<Vec<StatTable>> {
        let mut tables = Vec::new();

        for category in Category::GAME {
            if !category.is_core() && !self.include_advanced {
                continue;
            }
            match self.category_table(docs, category)? {
                Some(table) => tables.push(table),
                None => log::debug!("No {} table on {}", category, url),
            }
        }

        if !tables.iter().any(|t| t.category.is_core()) {
            return Err(AppError::parse(url, "no box score tables found on page"));
        }
        Ok(tables)
    }

    fn category_table(&self, docs: &PageDocuments, category: Category) -> Result<Option<StatTable>> {
        let Some(id) = category.table_id() else {
            return Ok(None);
        };
        let table_sel = selector(&format!("table#{id}"))?;
        Ok(docs
            .first(&table_sel)
            .map(|table| StatTable::new(category, table_rows(&table))))
    }

    /// Absolute box-score URLs listed on a week's schedule page, in page order.
    ///
    /// Only games with a final box score carry such a link, so an empty
    /// result is a normal outcome (e.g. a week with no games played).
    pub fn box_score_urls(&self, page: &RawPage) -> Result<Vec<String>> {
        let docs = PageDocuments::parse(&page.body);
        let link_sel = selector(".gamelink a[href]")?;

        let mut seen = HashSet::new();
        Ok(docs
            .select(&link_sel)
            .filter_map(|a| a.value().attr("href"))
            .filter(|href| is_box_score_href(href))
            .map(|href| resolve_url(&self.base, href))
            .filter(|url| seen.insert(url.clone()))
            .collect())
    }

    /// Week numbers linked from a season page, ascending.
    pub fn week_numbers(&self, page: &RawPage) -> Result<Vec<u32>> {
        let docs = PageDocuments::parse(&page.body);
        let link_sel = selector("#div_week_games a[href]")?;
        let week_re = Regex::new(r"week_(\d{1,2})\.htm")
            .map_err(|e| AppError::parse("week link pattern", e))?;

        let mut weeks: Vec<u32> = docs
            .select(&link_sel)
            .filter(|a| element_text(a).starts_with("Week"))
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| week_re.captures(href))
            .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
            .collect();
        weeks.sort_unstable();
        weeks.dedup();
        Ok(weeks)
    }

    /// Game identifier from the page's canonical link, falling back to the
    /// fetched URL.
    pub fn game_id(&self, docs: &PageDocuments, url: &str) -> Option<String> {
        let canonical = selector("link[rel=canonical]")
            .ok()
            .and_then(|sel| docs.first(&sel).and_then(|l| l.value().attr("href").map(str::to_string)));

        canonical
            .as_deref()
            .and_then(game_id_from_url)
            .or_else(|| game_id_from_url(url))
    }
}

fn is_box_score_href(href: &str) -> bool {
    href.contains("/boxscores/") && href.ends_with(".htm") && !href.ends_with("index.htm")
}

/// `https://.../boxscores/202309070kan.htm` -> `202309070kan`
pub fn game_id_from_url(url: &str) -> Option<String> {
    let re = Regex::new(r"/boxscores/(\w+)\.htm").ok()?;
    re.captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Raw cell text for every row of a table, header rows included.
///
/// Cells spanning several columns are padded with empty cells so positions
/// stay aligned with the header. When rows carry a player id
/// (`data-append-csv`), it is appended as a trailing `player_id` column.
fn table_rows(table: &ElementRef) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut has_ids = false;

    for row in table.descendants().filter_map(ElementRef::wrap) {
        if row.value().name() != "tr" {
            continue;
        }
        let in_thead = row
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|a| a.value().name() == "thead");

        let mut cells = Vec::new();
        let mut player_id = None;
        for cell in row.children().filter_map(ElementRef::wrap) {
            let name = cell.value().name();
            if name != "th" && name != "td" {
                continue;
            }
            if let Some(id) = cell.value().attr("data-append-csv") {
                player_id = Some(id.to_string());
            }
            cells.push(element_text(&cell));
            let span: usize = cell
                .value()
                .attr("colspan")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1);
            cells.extend(std::iter::repeat_n(String::new(), span.saturating_sub(1)));
        }

        has_ids |= player_id.is_some();
        rows.push((cells, player_id, in_thead));
    }

    rows.into_iter()
        .map(|(mut cells, player_id, in_thead)| {
            if has_ids {
                cells.push(match player_id {
                    Some(id) => id,
                    None if in_thead => "player_id".to_string(),
                    None => String::new(),
                });
            }
            cells
        })
        .collect()
}
