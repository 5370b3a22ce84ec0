//! Output persistence.
//!
//! The pipeline produces `(path, sheet)` pairs; an [`OutputSink`] persists
//! them. Paths come from [`PathResolver`], which is pure.
//!
//! ```text
//! {root}/
//! ├── players                   # player mode
//! └── 2023/
//!     └── 1/
//!         ├── Offense           # one CSV per category per week
//!         ├── Defense
//!         └── 202309070kan/     # split_by_game = true
//!             └── Offense
//! ```

pub mod local;
mod path;

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Sheet;

pub use local::{LocalCsvSink, ensure_writable, render_csv};
pub use path::PathResolver;

/// Persists one sheet as one file, replacing whatever was there.
#[async_trait]
pub trait OutputSink: Send + Sync {
    async fn write(&self, path: &Path, sheet: &Sheet) -> Result<()>;
}
