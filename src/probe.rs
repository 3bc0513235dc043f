//! Source-capability probe.

use crate::core::{Result, TableId};
use crate::store::TableEngine;

const TIMESTAMP_FIELD: &str = "Timestamp";
const EMAIL_FIELD: &str = "Email Address";

/// Best-effort check that a candidate source table is form-backed.
///
/// A source is accepted if any of:
/// - the backend reports a linked originating form for the table,
/// - the caller states a record-arrival event registration already targets
///   the hosting file (`event_registered`),
/// - the header row contains both a literal `"Timestamp"` and a literal
///   `"Email Address"` field.
///
/// This is a heuristic with known imprecision in both directions: a renamed
/// header column produces a false negative, a hand-built table with both
/// literals a false positive. Setup accepts that trade-off rather than
/// probing deeper.
pub fn source_is_form_compatible<E: TableEngine + ?Sized>(
    engine: &E,
    table: &TableId,
    event_registered: bool,
) -> Result<bool> {
    if engine.linked_form(table)?.is_some() {
        return Ok(true);
    }
    if event_registered {
        return Ok(true);
    }

    let header = engine.read_header(table)?;
    let mut has_timestamp = false;
    let mut has_email = false;
    for value in &header.values {
        match value.as_str() {
            Some(TIMESTAMP_FIELD) => has_timestamp = true,
            Some(EMAIL_FIELD) => has_email = true,
            _ => {}
        }
    }
    Ok(has_timestamp && has_email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FormattedRow, Value};
    use crate::store::InMemoryTables;

    fn table_with_header(tables: &mut InMemoryTables, fields: &[&str]) -> TableId {
        let header = FormattedRow::plain(fields.iter().map(|f| Value::Text((*f).into())).collect());
        tables.create_with_header("Candidate", header).unwrap()
    }

    #[test]
    fn test_accepts_linked_form() {
        let mut tables = InMemoryTables::new();
        let id = table_with_header(&mut tables, &["Anything"]);
        tables.set_linked_form(&id, "Survey 2026").unwrap();

        assert!(source_is_form_compatible(&tables, &id, false).unwrap());
    }

    #[test]
    fn test_accepts_existing_event_registration() {
        let mut tables = InMemoryTables::new();
        let id = table_with_header(&mut tables, &["Anything"]);

        assert!(source_is_form_compatible(&tables, &id, true).unwrap());
    }

    #[test]
    fn test_accepts_form_style_header() {
        let mut tables = InMemoryTables::new();
        let id = table_with_header(&mut tables, &["Timestamp", "Email Address", "Department"]);

        assert!(source_is_form_compatible(&tables, &id, false).unwrap());
    }

    #[test]
    fn test_rejects_when_no_signal_matches() {
        let mut tables = InMemoryTables::new();
        let id = table_with_header(&mut tables, &["Timestamp", "Department"]);

        assert!(!source_is_form_compatible(&tables, &id, false).unwrap());
    }
}
