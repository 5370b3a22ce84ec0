//! Column-aligned accumulation of records bound for one output file.

use std::collections::HashMap;

use super::{Record, Value};

/// Header plus rows, aligned to the ordered union of record columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    header: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Value>>,
}

impl Sheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sheet with a fixed leading header, used when a file must carry a
    /// header even if no rows arrive.
    pub fn with_header<S: AsRef<str>>(columns: &[S]) -> Self {
        let mut sheet = Self::new();
        for column in columns {
            sheet.column_index(column.as_ref());
        }
        sheet
    }

    /// Append a record; unseen columns are added to the right in first-seen order.
    pub fn push(&mut self, record: Record) {
        let mut row = vec![Value::Null; self.header.len()];
        for (name, value) in record.fields {
            let idx = self.column_index(&name);
            if idx >= row.len() {
                row.resize(idx + 1, Value::Null);
            }
            row[idx] = value;
        }
        self.rows.push(row);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = Record>) {
        for record in records {
            self.push(record);
        }
    }

    /// Append another sheet's rows, mapping its columns onto this header.
    pub fn append(&mut self, other: Sheet) {
        let mapping: Vec<usize> = other
            .header
            .iter()
            .map(|name| self.column_index(name))
            .collect();
        for row in other.rows {
            let mut aligned = vec![Value::Null; self.header.len()];
            for (i, value) in row.into_iter().enumerate() {
                if let Some(&idx) = mapping.get(i) {
                    aligned[idx] = value;
                }
            }
            self.rows.push(aligned);
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows padded to the full header width.
    pub fn rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        let width = self.header.len();
        self.rows.iter().map(move |row| {
            let mut cells: Vec<String> = row.iter().map(Value::to_string).collect();
            cells.resize(width, String::new());
            cells
        })
    }

    fn column_index(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.header.len();
        self.header.push(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn record(fields: &[(&str, Value)]) -> Record {
        Record::new(
            Category::Defense,
            fields.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
        )
    }

    #[test]
    fn columns_union_in_first_seen_order() {
        let mut sheet = Sheet::new();
        sheet.push(record(&[("Player", "A".into()), ("Int", Value::Int(1))]));
        sheet.push(record(&[("Player", "B".into()), ("Sk", Value::Float { value: 0.5, text: "0.5".into() })]));

        assert_eq!(sheet.header(), &["Player", "Int", "Sk"]);
        let rows: Vec<Vec<String>> = sheet.rows().collect();
        assert_eq!(rows[0], vec!["A", "1", ""]);
        assert_eq!(rows[1], vec!["B", "", "0.5"]);
    }

    #[test]
    fn append_aligns_columns_by_name() {
        let mut week = Sheet::with_header(&["game_id", "Player", "Yds"]);
        week.push(record(&[("game_id", "g1".into()), ("Player", "A".into()), ("Yds", Value::Int(10))]));

        let mut game = Sheet::new();
        game.push(record(&[("game_id", "g2".into()), ("Player", "B".into()), ("TD", Value::Int(1))]));
        week.append(game);

        assert_eq!(week.header(), &["game_id", "Player", "Yds", "TD"]);
        let rows: Vec<Vec<String>> = week.rows().collect();
        assert_eq!(rows[0], vec!["g1", "A", "10", ""]);
        assert_eq!(rows[1], vec!["g2", "B", "", "1"]);
    }

    #[test]
    fn fixed_header_survives_without_rows() {
        let sheet = Sheet::with_header(&["name", "position"]);
        assert!(sheet.is_empty());
        assert_eq!(sheet.header(), &["name", "position"]);
    }
}
