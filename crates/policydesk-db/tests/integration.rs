use policydesk_db::{create_pool, init_schema, DbRuntimeSettings, TABLES};

#[test]
fn db_initialization_works() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("policydesk.db");
    let pool = create_pool(path.to_str().unwrap(), DbRuntimeSettings::default())
        .expect("failed to create pool");

    {
        let conn = pool.get().expect("failed to get connection");
        let failures = init_schema(&conn);
        assert!(failures.is_empty(), "schema init failed: {failures:?}");
    }

    // A second connection sees the same file.
    let conn = pool.get().expect("failed to get connection");
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
        .expect("failed to prepare table query");
    let tables: Vec<String> = stmt
        .query_map([], |row| row.get(0))
        .expect("failed to execute table query")
        .map(|r| r.expect("failed to read table name"))
        .collect();

    assert_eq!(tables.len(), TABLES.len());
    for table in TABLES {
        assert!(tables.iter().any(|t| t == table.name), "missing {}", table.name);
    }

    let mode: String = conn
        .query_row("PRAGMA journal_mode;", [], |row| row.get(0))
        .expect("should query journal_mode");
    assert_eq!(mode, "wal");
}

#[test]
fn declared_foreign_key_is_not_enforced_by_default() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("policydesk.db");
    let pool = create_pool(path.to_str().unwrap(), DbRuntimeSettings::default())
        .expect("failed to create pool");
    let conn = pool.get().expect("failed to get connection");
    assert!(init_schema(&conn).is_empty());

    conn.execute("INSERT INTO policies (memberId, planType) VALUES (999, 'Gold')", [])
        .expect("dangling memberId should be accepted");
}

#[test]
fn declared_foreign_key_enforced_when_enabled() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("policydesk.db");
    let settings = DbRuntimeSettings {
        enforce_foreign_keys: true,
        ..DbRuntimeSettings::default()
    };
    let pool = create_pool(path.to_str().unwrap(), settings).expect("failed to create pool");
    let conn = pool.get().expect("failed to get connection");
    assert!(init_schema(&conn).is_empty());

    let result = conn.execute("INSERT INTO policies (memberId, planType) VALUES (999, 'Gold')", []);
    assert!(result.is_err(), "dangling memberId should be rejected");
}
