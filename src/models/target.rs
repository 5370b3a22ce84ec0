//! Output file identities.

use super::Category;

/// Identifies exactly one output file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OutputTarget {
    /// One category of one week, optionally narrowed to a single box score
    Game {
        year: u32,
        week: u32,
        category: Category,
        game_id: Option<String>,
    },
    /// The single flat player index file
    Players,
}

impl OutputTarget {
    pub fn week(year: u32, week: u32, category: Category) -> Self {
        Self::Game {
            year,
            week,
            category,
            game_id: None,
        }
    }

    pub fn game(year: u32, week: u32, game_id: impl Into<String>, category: Category) -> Self {
        Self::Game {
            year,
            week,
            category,
            game_id: Some(game_id.into()),
        }
    }
}
