//! URL construction for season, week and player index pages.

use url::Url;

use crate::error::{AppError, Result};
use crate::models::FetchRequest;

/// Player index shards, one per surname initial.
pub const SHARD_LETTERS: std::ops::RangeInclusive<char> = 'A'..='Z';

/// Number of regular-season weeks when the season page does not say.
pub fn default_season_weeks(year: u32) -> u32 {
    match year {
        2021.. => 18,
        1993 => 18,
        1990..=2020 => 17,
        1978..=1989 => 16,
        _ => 14,
    }
}

/// Maps [`FetchRequest`]s to absolute URLs under the configured site root.
#[derive(Debug, Clone)]
pub struct PageLocator {
    base: Url,
}

impl PageLocator {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(AppError::config(format!("{base_url} cannot be a base URL")));
        }
        Ok(Self { base })
    }

    fn join(&self, path: &str) -> String {
        format!("{}{}", self.base.as_str().trim_end_matches('/'), path)
    }

    /// Season overview page, which links every week of the season.
    pub fn season_url(&self, year: u32) -> String {
        self.join(&format!("/years/{year}/"))
    }

    /// Weekly schedule page listing that week's box scores.
    pub fn schedule_url(&self, year: u32, week: u32) -> String {
        self.join(&format!("/years/{year}/week_{week}.htm"))
    }

    pub fn shard_url(&self, letter: char) -> String {
        self.join(&format!("/players/{}/", letter.to_ascii_uppercase()))
    }

    pub fn url_for(&self, request: &FetchRequest) -> String {
        match *request {
            FetchRequest::Week { year, week } => self.schedule_url(year, week),
            FetchRequest::Shard { letter } => self.shard_url(letter),
        }
    }

    /// Week requests for a season, in the order given.
    pub fn week_requests(year: u32, weeks: impl IntoIterator<Item = u32>) -> Vec<FetchRequest> {
        weeks
            .into_iter()
            .map(|week| FetchRequest::Week { year, week })
            .collect()
    }

    /// Shard requests A through Z.
    pub fn shard_requests() -> Vec<FetchRequest> {
        SHARD_LETTERS
            .map(|letter| FetchRequest::Shard { letter })
            .collect()
    }
}
