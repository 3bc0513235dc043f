use super::{Result, RouterError, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub type Row = Vec<Value>;

/// Opaque table identifier assigned by the table engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableId(Uuid);

impl TableId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TableId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TableId {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| RouterError::Serialization(format!("Invalid table id '{}': {}", s, e)))
    }
}

/// One row of cell values with its per-cell formatting payload.
///
/// The three vectors are parallel; `styles` and `backgrounds` may use `None`
/// for cells carrying no explicit formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedRow {
    pub values: Row,
    pub styles: Vec<Option<String>>,
    pub backgrounds: Vec<Option<String>>,
}

impl FormattedRow {
    pub fn new(values: Row, styles: Vec<Option<String>>, backgrounds: Vec<Option<String>>) -> Self {
        Self { values, styles, backgrounds }
    }

    /// A row of plain values with no formatting attached.
    pub fn plain(values: Row) -> Self {
        let width = values.len();
        Self {
            values,
            styles: vec![None; width],
            backgrounds: vec![None; width],
        }
    }

    pub fn width(&self) -> usize {
        self.values.len()
    }

    /// Clamps the row to exactly `width` cells, padding with empty cells or
    /// dropping trailing ones. Guards the append path against a partition
    /// whose header is narrower than a later source row.
    pub fn fitted_to(&self, width: usize) -> FormattedRow {
        let mut values = self.values.clone();
        values.resize(width, Value::Null);
        let mut styles = self.styles.clone();
        styles.resize(width, None);
        let mut backgrounds = self.backgrounds.clone();
        backgrounds.resize(width, None);
        Self { values, styles, backgrounds }
    }
}

/// Stable identity of one physical row in the configured source table.
///
/// Not stable across the source table being deleted and re-created; reset
/// clears all recorded identities together with the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordIdentity {
    pub table: TableId,
    pub position: u64,
}

impl RecordIdentity {
    pub fn new(table: TableId, position: u64) -> Self {
        Self { table, position }
    }
}

impl fmt::Display for RecordIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.table, self.position)
    }
}

/// Routing configuration recorded by setup and required by every routing
/// operation. `field_index` is 1-based, matching row positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    pub source_table: TableId,
    pub field_index: usize,
}

impl Configuration {
    pub fn new(source_table: TableId, field_index: usize) -> Self {
        Self { source_table, field_index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_id_roundtrip() {
        let id = TableId::new();
        let parsed: TableId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_table_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<TableId>().is_err());
    }

    #[test]
    fn test_identity_format() {
        let table = TableId::new();
        let identity = RecordIdentity::new(table, 7);
        assert_eq!(identity.to_string(), format!("{}_7", table));
    }

    #[test]
    fn test_fitted_to_pads_and_truncates() {
        let row = FormattedRow::plain(vec![Value::Integer(1), Value::Integer(2)]);

        let padded = row.fitted_to(4);
        assert_eq!(padded.width(), 4);
        assert_eq!(padded.values[3], Value::Null);
        assert_eq!(padded.styles.len(), 4);

        let truncated = row.fitted_to(1);
        assert_eq!(truncated.values, vec![Value::Integer(1)]);
        assert_eq!(truncated.backgrounds.len(), 1);
    }
}
