//! Units of work handed to the pipeline.

use std::fmt;
use std::path::PathBuf;

/// What a run downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Per-game box-score stats for one season
    #[default]
    Game,
    /// The historical player index
    Player,
}

/// A fully resolved top-level request, as produced by the CLI.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub mode: Mode,
    /// Season year; required in game mode
    pub year: Option<u32>,
    /// Restrict game mode to a single week
    pub week: Option<u32>,
    /// Root directory all output paths are resolved under
    pub output_dir: PathBuf,
}

/// A single page-level unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchRequest {
    /// One week of one season (game-log mode)
    Week { year: u32, week: u32 },
    /// One partition of the player index, keyed by surname initial
    Shard { letter: char },
}

impl fmt::Display for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FetchRequest::Week { year, week } => write!(f, "{year} week {week}"),
            FetchRequest::Shard { letter } => write!(f, "players/{letter}"),
        }
    }
}
