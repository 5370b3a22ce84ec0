//! Typed records parsed from table rows.

use std::fmt;

use super::Category;

/// A single parsed cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    /// A decimal number with the cell text it was read from, so `10.0`
    /// renders as `10.0` rather than `10`.
    Float { value: f64, text: String },
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float { text, .. } => f.write_str(text),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

/// One table row as ordered `(column, value)` pairs, tagged by category.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub category: Category,
    pub fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new(category: Category, fields: Vec<(String, Value)>) -> Self {
        Self { category, fields }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Prepend context columns such as year, week and game id.
    pub fn with_context(mut self, context: &[(&str, Value)]) -> Self {
        let mut fields: Vec<(String, Value)> = context
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        fields.append(&mut self.fields);
        self.fields = fields;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_renders_empty() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Int(-12).to_string(), "-12");
        let float = Value::Float { value: 7.5, text: "7.5".into() };
        assert_eq!(float.to_string(), "7.5");
    }

    #[test]
    fn float_renders_its_source_text() {
        let float = Value::Float { value: 10.0, text: "10.0".into() };
        assert_eq!(float.to_string(), "10.0");
    }

    #[test]
    fn context_is_prepended_in_order() {
        let record = Record::new(
            Category::Kicking,
            vec![("Player".into(), "Justin Tucker".into())],
        )
        .with_context(&[("year", 2023u32.into()), ("week", 1u32.into())]);

        let columns: Vec<&str> = record.columns().collect();
        assert_eq!(columns, vec!["year", "week", "Player"]);
        assert_eq!(record.get("week"), Some(&Value::Int(1)));
    }
}
