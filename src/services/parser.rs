//! Record parsing for extracted tables.
//!
//! Parsing never fails: a malformed cell becomes a text or null value, and
//! a table without a header yields no records.

use std::collections::HashSet;

use crate::models::{Record, StatTable, Value};

/// Columns that identify a player or team and always stay text.
const IDENTITY_COLUMNS: &[&str] = &[
    "player", "name", "player_id", "tm", "team", "pos", "position", "game_id",
];

/// Coerce a cell: integer, then float, then text. Empty cells are null.
///
/// Only canonical integers (no sign prefix, no leading zeros) become
/// [`Value::Int`], so every integer renders back to its source text.
pub fn coerce(cell: &str) -> Value {
    let s = cell.trim();
    if s.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = s.parse::<i64>() {
        if n.to_string() == s {
            return Value::Int(n);
        }
        return Value::Text(s.to_string());
    }
    if is_float_literal(s) {
        if let Ok(x) = s.parse::<f64>() {
            if x.is_finite() {
                return Value::Float { value: x, text: s.to_string() };
            }
        }
    }
    Value::Text(s.to_string())
}

fn is_float_literal(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_digit())
        && s.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'))
}

fn is_identity(column: &str) -> bool {
    IDENTITY_COLUMNS.iter().any(|c| c.eq_ignore_ascii_case(column))
}

/// Column names from header text: trimmed, blanks named by position, and
/// repeats suffixed with their position so names stay unique and stable.
pub fn column_names(header: &[String]) -> Vec<String> {
    column_names_reserving(&[], header)
}

/// Like [`column_names`], with `reserved` already taken: a header cell
/// matching a reserved name is suffixed like any other repeat.
pub fn column_names_reserving(reserved: &[&str], header: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = reserved.iter().map(|name| name.to_string()).collect();
    header
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let base = match raw.trim() {
                "" => format!("col_{i}"),
                label => label.to_string(),
            };
            let mut name = base.clone();
            let mut n = i;
            while !seen.insert(name.clone()) {
                name = format!("{base}_{n}");
                n += 1;
            }
            name
        })
        .collect()
}

/// Parse every data row of a table into a record.
pub fn parse(table: &StatTable) -> Vec<Record> {
    parse_reserving(table, &[])
}

/// Parse a table whose records will be prefixed with the `reserved`
/// columns; colliding header names are renamed per [`column_names_reserving`].
pub fn parse_reserving(table: &StatTable, reserved: &[&str]) -> Vec<Record> {
    let Some(header) = table.header() else {
        return Vec::new();
    };
    let columns = column_names_reserving(reserved, header);

    table
        .data_rows()
        .map(|row| {
            if row.len() > columns.len() {
                log::debug!(
                    "{} row has {} cells for {} columns; extra cells dropped",
                    table.category,
                    row.len(),
                    columns.len()
                );
            }
            let fields = columns
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    let value = if is_identity(column) {
                        match cell.trim() {
                            "" => Value::Null,
                            text => Value::Text(text.to_string()),
                        }
                    } else {
                        coerce(cell)
                    };
                    (column.clone(), value)
                })
                .collect();
            Record::new(table.category, fields)
        })
        .collect()
}
