use std::sync::Arc;

use deadpool_sqlite::rusqlite;
use deadpool_sqlite::rusqlite::ToSql;
use deadpool_sqlite::rusqlite::types::Value;
use deadpool_sqlite::{Config as SqliteConfig, Object, Runtime};

use crate::client::DbClient;
use crate::config::effective_pool_size;
use crate::error::SqlCrudError;
use crate::pool::DbPool;
use crate::results::{DbRow, ResultSet};
use crate::types::{RowValues, WriteResult};

impl DbClient {
    /// Connect to a SQLite database file and build the shared pool.
    ///
    /// `connection_limit` defaults to 5 when unset or zero. WAL journaling
    /// is enabled up front so pooled readers and the writer coexist.
    pub async fn connect_sqlite(
        db_path: impl Into<String>,
        connection_limit: Option<usize>,
    ) -> Result<Self, SqlCrudError> {
        let db_path = db_path.into();
        if db_path.is_empty() {
            return Err(SqlCrudError::ConfigError("db_path is required".to_string()));
        }

        let mut cfg = SqliteConfig::new(db_path);
        cfg.pool = Some(deadpool::managed::PoolConfig::new(effective_pool_size(
            connection_limit,
        )));

        let pool = cfg.create_pool(Runtime::Tokio1).map_err(|e| {
            SqlCrudError::ConnectionError(format!("Failed to create SQLite pool: {e}"))
        })?;

        {
            let conn = pool.get().await.map_err(SqlCrudError::PoolErrorSqlite)?;
            conn.interact(|conn| {
                conn.execute_batch("PRAGMA journal_mode = WAL;")
                    .map_err(SqlCrudError::SqliteError)
            })
            .await??;
        }

        Ok(DbClient::from_pool(DbPool::Sqlite(pool)))
    }
}

/// Bind unified params to SQLite values.
pub(crate) fn convert_params(params: &[RowValues]) -> Vec<Value> {
    params
        .iter()
        .map(|p| match p {
            RowValues::Int(i) => Value::Integer(*i),
            RowValues::Float(f) => Value::Real(*f),
            RowValues::Text(s) => Value::Text(s.clone()),
            RowValues::Bool(b) => Value::Integer(i64::from(*b)),
            RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
            RowValues::Null => Value::Null,
            RowValues::JSON(jsval) => Value::Text(jsval.to_string()),
            RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
        })
        .collect()
}

fn extract_value(row: &rusqlite::Row, idx: usize) -> Result<RowValues, SqlCrudError> {
    match row.get_ref(idx)? {
        rusqlite::types::ValueRef::Null => Ok(RowValues::Null),
        rusqlite::types::ValueRef::Integer(i) => Ok(RowValues::Int(i)),
        rusqlite::types::ValueRef::Real(f) => Ok(RowValues::Float(f)),
        rusqlite::types::ValueRef::Text(bytes) => {
            Ok(RowValues::Text(String::from_utf8_lossy(bytes).into_owned()))
        }
        rusqlite::types::ValueRef::Blob(b) => Ok(RowValues::Blob(b.to_vec())),
    }
}

fn build_result_set(
    stmt: &mut rusqlite::Statement,
    params: &[Value],
) -> Result<ResultSet, SqlCrudError> {
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|v| v as &dyn ToSql).collect();
    let column_names: Arc<Vec<String>> = Arc::new(
        stmt.column_names()
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
    );

    let mut rows_iter = stmt.query(&param_refs[..])?;
    let mut result_set = ResultSet::default();

    while let Some(row) = rows_iter.next()? {
        let mut values = Vec::with_capacity(column_names.len());
        for i in 0..column_names.len() {
            values.push(extract_value(row, i)?);
        }
        result_set.rows.push(DbRow::new(column_names.clone(), values));
    }

    Ok(result_set)
}

/// Execute a statement that returns rows on the interact thread pool.
pub(crate) async fn execute_select(
    sqlite_client: &Object,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, SqlCrudError> {
    let query_owned = query.to_owned();
    let params_owned = convert_params(params);

    sqlite_client
        .interact(move |conn| {
            let mut stmt = conn.prepare(&query_owned)?;
            build_result_set(&mut stmt, &params_owned)
        })
        .await?
}

/// Execute a DML or DDL statement on the interact thread pool.
///
/// `last_insert_id` is the connection's `last_insert_rowid`, meaningful
/// only right after an INSERT.
pub(crate) async fn execute_dml(
    sqlite_client: &Object,
    query: &str,
    params: &[RowValues],
) -> Result<WriteResult, SqlCrudError> {
    let query_owned = query.to_owned();
    let params_owned = convert_params(params);

    sqlite_client
        .interact(move |conn| -> Result<WriteResult, SqlCrudError> {
            let rows_affected = {
                let mut stmt = conn.prepare(&query_owned)?;
                let param_refs: Vec<&dyn ToSql> =
                    params_owned.iter().map(|v| v as &dyn ToSql).collect();
                stmt.execute(&param_refs[..])?
            };
            Ok(WriteResult {
                rows_affected: rows_affected as u64,
                last_insert_id: Some(conn.last_insert_rowid()),
            })
        })
        .await?
}
