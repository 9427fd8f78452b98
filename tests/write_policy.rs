#![cfg(feature = "sqlite")]

//! The two error policies: read/raw paths propagate driver failures
//! unmodified, write helpers carry operation+table context and collapse to
//! an absence value through `or_log()`.

use sql_crud::prelude::*;
use tempfile::tempdir;

fn unique_db_path(prefix: &str) -> String {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join(format!("{prefix}.db"));
    std::mem::forget(dir);
    path.to_string_lossy().into_owned()
}

async fn empty_db(prefix: &str) -> DbClient {
    DbClient::connect_sqlite(unique_db_path(prefix), None)
        .await
        .expect("sqlite pool")
}

#[tokio::test]
async fn read_path_propagates_driver_errors() {
    let db = empty_db("read_propagates").await;

    let err = db
        .find_all("missing_table", "id", &ColumnMap::new(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, SqlCrudError::SqliteError(_)), "{err}");

    let err = db
        .query("SELECT * FROM missing_table", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, SqlCrudError::SqliteError(_)), "{err}");
}

#[tokio::test]
async fn write_path_wraps_errors_with_context() {
    let db = empty_db("write_context").await;

    let err = db
        .insert("missing_table", &ColumnMap::new().set("a", 1))
        .await
        .unwrap_err();
    match &err {
        SqlCrudError::WriteFailed { op, table, .. } => {
            assert_eq!(*op, "insert");
            assert_eq!(table, "missing_table");
        }
        other => panic!("expected WriteFailed, got {other}"),
    }
    assert!(err.to_string().contains("insert on missing_table failed"));
}

#[tokio::test]
async fn or_log_collapses_write_failures_to_none() {
    let db = empty_db("or_log").await;

    let outcome = db
        .insert("missing_table", &ColumnMap::new().set("a", 1))
        .await
        .or_log();
    assert!(outcome.is_none());

    let outcome = db
        .update(
            "missing_table",
            &ColumnMap::new().set("a", 1),
            &ColumnMap::new().set("id", 5),
        )
        .await
        .or_log();
    assert!(outcome.is_none());

    let outcome = db.drop_table("missing_table").await.or_log();
    assert!(outcome.is_none());
}

#[tokio::test]
async fn or_log_passes_successes_through() {
    let db = empty_db("or_log_ok").await;
    db.execute("CREATE TABLE t (id INTEGER PRIMARY KEY, x INTEGER)", &[])
        .await
        .unwrap();

    let result = db
        .insert("t", &ColumnMap::new().set("x", 42))
        .await
        .or_log()
        .expect("insert should succeed");
    assert_eq!(result.rows_affected, 1);
}

#[tokio::test]
async fn invalid_parameters_fail_before_dispatch() {
    let db = empty_db("param_errors").await;

    // empty data map
    let err = db.insert("t", &ColumnMap::new()).await.unwrap_err();
    assert!(matches!(err, SqlCrudError::WriteFailed { .. }));
    assert!(err.to_string().contains("at least one column"), "{err}");

    // mismatched insert_many row shapes
    let rows = vec![
        ColumnMap::from([("a", 1), ("b", 2)]),
        ColumnMap::from([("b", 4), ("a", 3)]),
    ];
    let err = db.insert_many("t", &rows).await.unwrap_err();
    match &err {
        SqlCrudError::WriteFailed { op, source, .. } => {
            assert_eq!(*op, "insert_many");
            assert!(matches!(**source, SqlCrudError::ParameterError(_)));
        }
        other => panic!("expected WriteFailed, got {other}"),
    }

    // bad identifier never reaches the database
    let err = db
        .insert("", &ColumnMap::new().set("a", 1))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("empty identifier"), "{err}");
}

#[tokio::test]
async fn failed_statement_still_records_last_query() {
    let db = empty_db("last_query_on_failure").await;

    let _ = db
        .update_first(
            "missing_table",
            &ColumnMap::new().set("x", 1),
            &ColumnMap::new().set("id", 5),
        )
        .await;

    // the statement was rendered and remembered before execution failed
    let rendered = db.last_query();
    assert!(rendered.contains("LIMIT 1"), "{rendered}");
    assert!(rendered.contains("SET x = 1"), "{rendered}");
    assert!(rendered.contains("id = 5"), "{rendered}");
}
