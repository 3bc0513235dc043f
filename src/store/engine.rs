use crate::core::{FormattedRow, Result, TableId};

/// Table access/creation abstraction - allows pluggable storage backends.
///
/// Positions are 1-based; position 1 is the header row. Implementations are
/// expected to preserve per-cell formatting verbatim through
/// `read_row`/`write_row`, since preserving visual categorization cues is
/// part of the routing contract.
pub trait TableEngine: Send + Sync {
    /// Create a new empty table and return its identifier.
    fn create_table(&mut self, name: &str) -> Result<TableId>;

    /// Look up a table by name; `None` when no table carries that name.
    fn find_table_by_name(&self, name: &str) -> Result<Option<TableId>>;

    /// The display name of a table.
    fn table_name(&self, table: &TableId) -> Result<String>;

    /// Read one row with its formatting.
    fn read_row(&self, table: &TableId, position: u64) -> Result<FormattedRow>;

    /// Read the header row (position 1) with its formatting.
    fn read_header(&self, table: &TableId) -> Result<FormattedRow> {
        self.read_row(table, 1)
    }

    /// Write one row (values, styles, backgrounds) at the given position.
    fn write_row(&mut self, table: &TableId, position: u64, row: &FormattedRow) -> Result<()>;

    /// Index of the last occupied row; 0 for an empty table.
    fn last_row_index(&self, table: &TableId) -> Result<u64>;

    /// Column count of the table; 0 for an empty table.
    fn last_column_index(&self, table: &TableId) -> Result<usize>;

    /// The originating form linked to this table, when the backend knows of
    /// one. Input to the source-capability probe.
    fn linked_form(&self, table: &TableId) -> Result<Option<String>>;
}
