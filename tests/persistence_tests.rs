/// Persistence tests for rowrouter
///
/// The processed set and configuration live in the key-value backend, so a
/// router rebuilt over a reopened file-backed store must keep its
/// idempotency guarantees across restarts.

use rowrouter::{
    BatchOptions, FileKv, FormattedRow, InMemoryTables, Router, RoutingOutcome, TableEngine,
    TableId, Value,
};
use tempfile::TempDir;

fn seeded_tables() -> (InMemoryTables, TableId) {
    let mut tables = InMemoryTables::new();
    let header = FormattedRow::plain(vec![
        Value::Text("Timestamp".into()),
        Value::Text("Email Address".into()),
        Value::Text("Department".into()),
    ]);
    let source = tables.create_with_header("Responses", header).unwrap();
    for (i, dept) in ["Sales", "Ops", "Sales"].iter().enumerate() {
        tables
            .push_row(
                &source,
                FormattedRow::plain(vec![
                    Value::Text(format!("t{}", i + 1)),
                    Value::Text(format!("u{}@x.com", i + 1)),
                    Value::Text((*dept).into()),
                ]),
            )
            .unwrap();
    }
    (tables, source)
}

#[test]
fn test_processed_set_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("router.json");
    let (tables, source) = seeded_tables();

    let mut router = Router::new(tables, FileKv::open(&store_path).unwrap())
        .with_batch_options(BatchOptions::unpaced());
    router.setup(source, 3).unwrap();
    assert_eq!(router.route_existing(2, 4).unwrap(), 3);

    // Restart: same tables, freshly reopened store.
    let (tables, _) = router.into_parts();
    let mut restarted = Router::new(tables, FileKv::open(&store_path).unwrap())
        .with_batch_options(BatchOptions::unpaced());

    assert_eq!(restarted.route_record(2).unwrap(), RoutingOutcome::SkippedAlreadyProcessed);
    assert_eq!(restarted.route_existing(2, 4).unwrap(), 0);
    assert!(restarted.configuration().unwrap().is_some());

    let sales = restarted.engine().find_table_by_name("Sales").unwrap().unwrap();
    assert_eq!(restarted.engine().last_row_index(&sales).unwrap(), 3);
}

#[test]
fn test_reset_persists_across_restart() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("router.json");
    let (tables, source) = seeded_tables();

    let mut router = Router::new(tables, FileKv::open(&store_path).unwrap())
        .with_batch_options(BatchOptions::unpaced());
    router.setup(source, 3).unwrap();
    router.route_existing(2, 4).unwrap();
    router.reset().unwrap();

    let (tables, _) = router.into_parts();
    let restarted = Router::new(tables, FileKv::open(&store_path).unwrap());
    assert!(restarted.configuration().unwrap().is_none());
}

#[test]
fn test_partial_routing_resumes_where_it_stopped() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("router.json");
    let (tables, source) = seeded_tables();

    let mut router = Router::new(tables, FileKv::open(&store_path).unwrap())
        .with_batch_options(BatchOptions::unpaced());
    router.setup(source, 3).unwrap();

    // Route only the first record, then restart.
    assert_eq!(router.route_record(2).unwrap(), RoutingOutcome::Routed);

    let (tables, _) = router.into_parts();
    let mut restarted = Router::new(tables, FileKv::open(&store_path).unwrap())
        .with_batch_options(BatchOptions::unpaced());

    // The bulk pass picks up the remaining two records only.
    assert_eq!(restarted.route_existing(2, 4).unwrap(), 2);
}
