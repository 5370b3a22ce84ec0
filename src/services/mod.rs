//! Service layer for the scraper.
//!
//! - Politeness gate (`RateLimiter`) and retrying fetcher (`PoliteFetcher`)
//! - URL construction (`PageLocator`)
//! - Table extraction from box scores (`TableExtractor`) and player index
//!   shards (`player_table`)
//! - Cell coercion and record parsing (`parser`)

pub mod extractor;
pub mod fetcher;
pub mod locator;
pub mod parser;
pub mod player_index;
pub mod throttle;

pub use extractor::{PageDocuments, TableExtractor};
pub use fetcher::{PoliteFetcher, ReqwestTransport, Transport};
pub use locator::{PageLocator, default_season_weeks};
pub use player_index::player_table;
pub use throttle::{Clock, RateLimiter, SystemClock};
