//! Output path resolution.

use std::path::PathBuf;

use crate::models::OutputTarget;

/// File name of the player index output.
pub const PLAYERS_FILE: &str = "players";

/// Maps an [`OutputTarget`] to its file under the output root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<root>/<year>/<week>[/<game_id>]/<Category>` or `<root>/players`.
    pub fn resolve(&self, target: &OutputTarget) -> PathBuf {
        match target {
            OutputTarget::Game {
                year,
                week,
                category,
                game_id,
            } => {
                let mut path = self.root.join(year.to_string()).join(week.to_string());
                if let Some(id) = game_id {
                    path.push(id);
                }
                path.join(category.label())
            }
            OutputTarget::Players => self.root.join(PLAYERS_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use std::collections::HashSet;

    #[test]
    fn game_targets_resolve_under_year_and_week() {
        let resolver = PathResolver::new("/data/pfr");
        assert_eq!(
            resolver.resolve(&OutputTarget::week(2023, 1, Category::Offense)),
            PathBuf::from("/data/pfr/2023/1/Offense")
        );
        assert_eq!(
            resolver.resolve(&OutputTarget::game(2023, 1, "202309070kan", Category::Kicking)),
            PathBuf::from("/data/pfr/2023/1/202309070kan/Kicking")
        );
        assert_eq!(
            resolver.resolve(&OutputTarget::Players),
            PathBuf::from("/data/pfr/players")
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let resolver = PathResolver::new("out");
        let target = OutputTarget::week(1999, 17, Category::Returns);
        assert_eq!(resolver.resolve(&target), resolver.resolve(&target.clone()));
    }

    #[test]
    fn distinct_targets_never_collide() {
        let resolver = PathResolver::new("out");
        let mut seen = HashSet::new();
        for year in [1970, 2022, 2023] {
            for week in 1..=18 {
                for category in Category::GAME {
                    let path = resolver.resolve(&OutputTarget::week(year, week, category));
                    assert!(seen.insert(path));
                }
            }
        }
        assert!(seen.insert(resolver.resolve(&OutputTarget::Players)));
    }
}
