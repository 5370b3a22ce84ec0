// src/lib.rs

//! Pro Football Reference scraper library
//!
//! Fetches weekly box scores and player index pages under a politeness
//! delay, pulls their statistical tables out (including those hidden in
//! HTML comments), and writes one CSV per category.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
#[cfg(any(test, feature = "testutil"))]
pub mod testutil;
pub mod utils;
