use super::engine::TableEngine;
use crate::core::{FormattedRow, Result, RouterError, TableId, Value};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct MemTable {
    name: String,
    rows: Vec<FormattedRow>,
    linked_form: Option<String>,
}

/// In-memory table backend. The bundled implementation for tests and
/// embedders that do not bring their own host platform.
#[derive(Debug, Default)]
pub struct InMemoryTables {
    tables: HashMap<TableId, MemTable>,
}

impl InMemoryTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience for fixtures: create a table whose first row is `header`.
    pub fn create_with_header(&mut self, name: &str, header: FormattedRow) -> Result<TableId> {
        let id = self.create_table(name)?;
        self.write_row(&id, 1, &header)?;
        Ok(id)
    }

    /// Appends a row after the last occupied one.
    pub fn push_row(&mut self, table: &TableId, row: FormattedRow) -> Result<u64> {
        let next = self.last_row_index(table)? + 1;
        self.write_row(table, next, &row)?;
        Ok(next)
    }

    /// Overwrite a single cell, keeping its formatting. Used to model a
    /// record acquiring a field value on edit.
    pub fn set_cell(&mut self, table: &TableId, position: u64, column: usize, value: Value) -> Result<()> {
        let mut row = self.read_row(table, position)?;
        if column == 0 || column > row.width() {
            return Err(RouterError::FieldOutOfRange(column, row.width()));
        }
        row.values[column - 1] = value;
        self.write_row(table, position, &row)
    }

    /// Marks the table as originating from the named form.
    pub fn set_linked_form(&mut self, table: &TableId, form: &str) -> Result<()> {
        let entry = self.table_mut(table)?;
        entry.linked_form = Some(form.to_string());
        Ok(())
    }

    /// All rows of a table, for assertions.
    pub fn rows(&self, table: &TableId) -> Result<&[FormattedRow]> {
        Ok(&self.table_ref(table)?.rows)
    }

    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.values().any(|t| t.name == name)
    }

    pub fn list_tables(&self) -> Vec<String> {
        self.tables.values().map(|t| t.name.clone()).collect()
    }

    fn table_ref(&self, table: &TableId) -> Result<&MemTable> {
        self.tables
            .get(table)
            .ok_or_else(|| RouterError::TableNotFound(table.to_string()))
    }

    fn table_mut(&mut self, table: &TableId) -> Result<&mut MemTable> {
        self.tables
            .get_mut(table)
            .ok_or_else(|| RouterError::TableNotFound(table.to_string()))
    }
}

impl TableEngine for InMemoryTables {
    fn create_table(&mut self, name: &str) -> Result<TableId> {
        let id = TableId::new();
        self.tables.insert(
            id,
            MemTable {
                name: name.to_string(),
                rows: Vec::new(),
                linked_form: None,
            },
        );
        Ok(id)
    }

    fn find_table_by_name(&self, name: &str) -> Result<Option<TableId>> {
        Ok(self
            .tables
            .iter()
            .find(|(_, t)| t.name == name)
            .map(|(id, _)| *id))
    }

    fn table_name(&self, table: &TableId) -> Result<String> {
        Ok(self.table_ref(table)?.name.clone())
    }

    fn read_row(&self, table: &TableId, position: u64) -> Result<FormattedRow> {
        let entry = self.table_ref(table)?;
        if position == 0 || position as usize > entry.rows.len() {
            return Err(RouterError::PositionOutOfRange(position, entry.name.clone()));
        }
        Ok(entry.rows[position as usize - 1].clone())
    }

    fn write_row(&mut self, table: &TableId, position: u64, row: &FormattedRow) -> Result<()> {
        let entry = self.table_mut(table)?;
        if position == 0 {
            return Err(RouterError::PositionOutOfRange(position, entry.name.clone()));
        }
        let index = position as usize - 1;
        while entry.rows.len() <= index {
            entry.rows.push(FormattedRow::plain(Vec::new()));
        }
        entry.rows[index] = row.clone();
        Ok(())
    }

    fn last_row_index(&self, table: &TableId) -> Result<u64> {
        Ok(self.table_ref(table)?.rows.len() as u64)
    }

    fn last_column_index(&self, table: &TableId) -> Result<usize> {
        let entry = self.table_ref(table)?;
        Ok(entry.rows.first().map(|r| r.width()).unwrap_or(0))
    }

    fn linked_form(&self, table: &TableId) -> Result<Option<String>> {
        Ok(self.table_ref(table)?.linked_form.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> FormattedRow {
        FormattedRow::plain(vec![
            Value::Text("Timestamp".into()),
            Value::Text("Email Address".into()),
            Value::Text("Department".into()),
        ])
    }

    #[test]
    fn test_create_and_find_by_name() {
        let mut tables = InMemoryTables::new();
        let id = tables.create_table("Responses").unwrap();

        assert_eq!(tables.find_table_by_name("Responses").unwrap(), Some(id));
        assert_eq!(tables.find_table_by_name("Missing").unwrap(), None);
        assert_eq!(tables.table_name(&id).unwrap(), "Responses");
    }

    #[test]
    fn test_rows_roundtrip_with_formatting() {
        let mut tables = InMemoryTables::new();
        let id = tables.create_with_header("Responses", header()).unwrap();

        let row = FormattedRow::new(
            vec![Value::Text("t1".into()), Value::Text("a@x.com".into()), Value::Text("Sales".into())],
            vec![Some("bold".into()), None, None],
            vec![None, None, Some("#ff0".into())],
        );
        let position = tables.push_row(&id, row.clone()).unwrap();

        assert_eq!(position, 2);
        assert_eq!(tables.read_row(&id, 2).unwrap(), row);
        assert_eq!(tables.last_row_index(&id).unwrap(), 2);
        assert_eq!(tables.last_column_index(&id).unwrap(), 3);
    }

    #[test]
    fn test_position_bounds() {
        let mut tables = InMemoryTables::new();
        let id = tables.create_with_header("Responses", header()).unwrap();

        assert!(matches!(
            tables.read_row(&id, 0),
            Err(RouterError::PositionOutOfRange(0, _))
        ));
        assert!(tables.read_row(&id, 9).is_err());
    }

    #[test]
    fn test_unknown_table() {
        let tables = InMemoryTables::new();
        let ghost = TableId::new();
        assert!(matches!(
            tables.read_row(&ghost, 1),
            Err(RouterError::TableNotFound(_))
        ));
    }

    #[test]
    fn test_set_cell() {
        let mut tables = InMemoryTables::new();
        let id = tables.create_with_header("Responses", header()).unwrap();
        tables
            .push_row(&id, FormattedRow::plain(vec![Value::Null, Value::Null, Value::Null]))
            .unwrap();

        tables.set_cell(&id, 2, 3, Value::Text("Ops".into())).unwrap();
        assert_eq!(tables.read_row(&id, 2).unwrap().values[2], Value::Text("Ops".into()));

        assert!(tables.set_cell(&id, 2, 9, Value::Null).is_err());
    }
}
