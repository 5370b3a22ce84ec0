// src/models/mod.rs

//! Domain models for the scraper.
//!
//! Data flows through these types in pipeline order: a [`FetchRequest`]
//! yields a [`RawPage`], which yields [`StatTable`]s, which yield
//! [`Record`]s, which are collected into a [`Sheet`] per [`OutputTarget`].

mod config;
mod page;
mod record;
mod report;
mod request;
mod sheet;
mod table;
mod target;

// Re-export all public types
pub use config::{Config, CrawlerConfig, OutputConfig, SeasonConfig, SiteConfig};
pub use page::RawPage;
pub use record::{Record, Value};
pub use report::{FailedTarget, RunReport};
pub use request::{FetchRequest, Mode, RunRequest};
pub use sheet::Sheet;
pub use table::{Category, StatTable};
pub use target::OutputTarget;
