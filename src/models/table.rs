//! Extracted statistical tables.

use std::fmt;

/// A named statistical grouping; one table per box score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Offense,
    Defense,
    Returns,
    Kicking,
    AdvPassing,
    AdvRushing,
    AdvReceiving,
    AdvDefense,
    Players,
}

impl Category {
    /// Box-score categories in emission order.
    pub const GAME: [Category; 8] = [
        Category::Offense,
        Category::Defense,
        Category::Returns,
        Category::Kicking,
        Category::AdvPassing,
        Category::AdvRushing,
        Category::AdvReceiving,
        Category::AdvDefense,
    ];

    /// Label used in logs and as the output file name.
    pub fn label(self) -> &'static str {
        match self {
            Category::Offense => "Offense",
            Category::Defense => "Defense",
            Category::Returns => "Returns",
            Category::Kicking => "Kicking",
            Category::AdvPassing => "AdvPassing",
            Category::AdvRushing => "AdvRushing",
            Category::AdvReceiving => "AdvReceiving",
            Category::AdvDefense => "AdvDefense",
            Category::Players => "Players",
        }
    }

    /// The `id` of the `<table>` carrying this category on a box score.
    pub fn table_id(self) -> Option<&'static str> {
        match self {
            Category::Offense => Some("player_offense"),
            Category::Defense => Some("player_defense"),
            Category::Returns => Some("returns"),
            Category::Kicking => Some("kicking"),
            Category::AdvPassing => Some("passing_advanced"),
            Category::AdvRushing => Some("rushing_advanced"),
            Category::AdvReceiving => Some("receiving_advanced"),
            Category::AdvDefense => Some("defense_advanced"),
            Category::Players => None,
        }
    }

    /// Core categories are expected on every box score.
    pub fn is_core(self) -> bool {
        matches!(
            self,
            Category::Offense | Category::Defense | Category::Returns | Category::Kicking
        )
    }

    /// Column labels the source prints in this category's header row.
    pub fn known_columns(self) -> &'static [&'static str] {
        match self {
            Category::Offense => &[
                "Player", "Tm", "Cmp", "Att", "Yds", "TD", "Int", "Sk", "Lng", "Rate", "Tgt",
                "Rec", "Fmb", "FL",
            ],
            Category::Defense => &[
                "Player", "Tm", "Int", "Yds", "TD", "Lng", "PD", "Sk", "Comb", "Solo", "Ast",
                "TFL", "QBHits", "FR", "FF",
            ],
            Category::Returns => &["Player", "Tm", "Rt", "Yds", "Y/Rt", "TD", "Lng", "Ret", "Y/R"],
            Category::Kicking => &[
                "Player", "Tm", "XPM", "XPA", "FGM", "FGA", "Pnt", "Yds", "Y/P", "Lng",
            ],
            Category::AdvPassing => &[
                "Player", "Tm", "Cmp", "Att", "Yds", "1D", "1D%", "IAY", "IAY/PA", "CAY",
                "YAC", "Drops", "BadTh", "Sk", "Bltz", "Hrry", "Prss",
            ],
            Category::AdvRushing => &[
                "Player", "Tm", "Att", "Yds", "TD", "1D", "YBC", "YBC/Att", "YAC", "YAC/Att",
                "BrkTkl", "Att/Br",
            ],
            Category::AdvReceiving => &[
                "Player", "Tm", "Tgt", "Rec", "Yds", "TD", "1D", "YBC", "YAC", "ADOT",
                "BrkTkl", "Drop", "Drop%", "Int", "Rat",
            ],
            Category::AdvDefense => &[
                "Player", "Tm", "Int", "Tgt", "Cmp", "Cmp%", "Yds", "TD", "Rat", "DADOT", "Air",
                "YAC", "Bltz", "Hrry", "QBKD", "Sk", "Prss", "Comb", "MTkl", "MTkl%",
            ],
            Category::Players => &[
                "name",
                "position",
                "years_active_start",
                "years_active_end",
                "active",
                "player_id",
            ],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One extracted table: a category plus raw cell text, header row included.
#[derive(Debug, Clone, PartialEq)]
pub struct StatTable {
    pub category: Category,
    pub rows: Vec<Vec<String>>,
}

impl StatTable {
    pub fn new(category: Category, rows: Vec<Vec<String>>) -> Self {
        Self { category, rows }
    }

    /// Index of the header row.
    ///
    /// The header is the first row whose non-empty cells are all textual and
    /// which shares at least one label with the category's known columns.
    /// Tables whose header matches no known label fall back to the first
    /// all-text row.
    pub fn header_index(&self) -> Option<usize> {
        let known = self.category.known_columns();
        let aligned = self.rows.iter().position(|row| {
            is_textual(row)
                && row
                    .iter()
                    .any(|cell| known.iter().any(|k| k.eq_ignore_ascii_case(cell.trim())))
        });
        aligned.or_else(|| self.rows.iter().position(|row| is_textual(row)))
    }

    pub fn header(&self) -> Option<&[String]> {
        self.header_index().map(|i| self.rows[i].as_slice())
    }

    /// Rows after the header, minus blank rows and repeated headers.
    pub fn data_rows(&self) -> impl Iterator<Item = &[String]> {
        let start = self.header_index().map_or(self.rows.len(), |i| i + 1);
        let header = self.header().unwrap_or(&[]);
        self.rows[start..]
            .iter()
            .map(Vec::as_slice)
            .filter(move |row| !is_divider(row, header))
    }

    pub fn data_row_count(&self) -> usize {
        self.data_rows().count()
    }
}

/// A row with at least one non-empty cell and no numeric-looking cells.
fn is_textual(row: &[String]) -> bool {
    let mut non_empty = row.iter().map(|c| c.trim()).filter(|c| !c.is_empty()).peekable();
    non_empty.peek().is_some() && non_empty.all(|c| !looks_numeric(c))
}

/// Blank rows and header rows repeated mid-table.
fn is_divider(row: &[String], header: &[String]) -> bool {
    let cells: Vec<&str> = row.iter().map(|c| c.trim()).collect();
    if cells.iter().all(|c| c.is_empty()) {
        return true;
    }
    if header.is_empty() || !is_textual(row) {
        return false;
    }
    let non_empty = cells.iter().filter(|c| !c.is_empty()).count();
    let same = cells
        .iter()
        .zip(header)
        .filter(|(c, h)| !c.is_empty() && c.eq_ignore_ascii_case(h.trim()))
        .count();
    same * 2 >= non_empty
}

fn looks_numeric(cell: &str) -> bool {
    let s = cell.trim().trim_end_matches('%');
    !s.is_empty() && s.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}
