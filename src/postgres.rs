use std::error::Error;
use std::sync::Arc;

use chrono::NaiveDateTime;
use deadpool_postgres::{Config as PgConfig, Object};
use bytes::BytesMut;
use serde_json::Value;
use tokio_postgres::{
    NoTls,
    types::{IsNull, ToSql, Type, to_sql_checked},
};

use crate::client::DbClient;
use crate::config::DbConfig;
use crate::error::SqlCrudError;
use crate::pool::DbPool;
use crate::results::{DbRow, ResultSet};
use crate::types::{RowValues, WriteResult};

impl DbClient {
    /// Connect to PostgreSQL and build the shared pool.
    ///
    /// Required fields are validated before any connection attempt; pool
    /// construction failure is wrapped so the cause surfaces immediately.
    pub async fn connect_postgres(config: DbConfig) -> Result<Self, SqlCrudError> {
        for (value, name) in [
            (&config.host, "host"),
            (&config.user, "user"),
            (&config.password, "password"),
            (&config.database, "database"),
        ] {
            if value.is_empty() {
                return Err(SqlCrudError::ConfigError(format!("{name} is required")));
            }
        }

        let mut pg_config = PgConfig::new();
        pg_config.host = Some(config.host.clone());
        pg_config.port = config.port;
        pg_config.user = Some(config.user.clone());
        pg_config.password = Some(config.password.clone());
        pg_config.dbname = Some(config.database.clone());
        pg_config.pool = Some(deadpool::managed::PoolConfig::new(config.pool_size()));

        let pool = pg_config
            .create_pool(Some(deadpool_postgres::Runtime::Tokio1), NoTls)
            .map_err(|e| {
                SqlCrudError::ConnectionError(format!("Failed to create Postgres pool: {e}"))
            })?;

        Ok(DbClient::from_pool(DbPool::Postgres(pool)))
    }
}

/// Container for Postgres parameters with lifetime tracking
pub(crate) struct Params<'a> {
    references: Vec<&'a (dyn ToSql + Sync)>,
}

impl<'a> Params<'a> {
    pub(crate) fn convert(params: &'a [RowValues]) -> Params<'a> {
        let references: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
        Params { references }
    }

    pub(crate) fn as_refs(&self) -> &[&(dyn ToSql + Sync)] {
        &self.references
    }
}

impl ToSql for RowValues {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            RowValues::Int(i) => (*i).to_sql(ty, out),
            RowValues::Float(f) => (*f).to_sql(ty, out),
            RowValues::Text(s) => s.to_sql(ty, out),
            RowValues::Bool(b) => (*b).to_sql(ty, out),
            RowValues::Timestamp(dt) => dt.to_sql(ty, out),
            RowValues::Null => Ok(IsNull::Yes),
            RowValues::JSON(jsval) => jsval.to_sql(ty, out),
            RowValues::Blob(bytes) => bytes.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::TEXT
                | Type::VARCHAR
                | Type::CHAR
                | Type::NAME
                | Type::BOOL
                | Type::TIMESTAMP
                | Type::TIMESTAMPTZ
                | Type::DATE
                | Type::JSON
                | Type::JSONB
                | Type::BYTEA
        )
    }

    to_sql_checked!();
}

/// Execute a statement that returns rows.
pub(crate) async fn execute_select(
    pg_client: &Object,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, SqlCrudError> {
    let params = Params::convert(params);
    let stmt = pg_client.prepare(query).await?;
    let rows = pg_client.query(&stmt, params.as_refs()).await?;

    let column_names: Arc<Vec<String>> = Arc::new(
        stmt.columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect(),
    );

    let mut result_set = ResultSet::with_capacity(rows.len());
    for row in rows {
        let mut values = Vec::with_capacity(column_names.len());
        for i in 0..column_names.len() {
            values.push(extract_value(&row, i)?);
        }
        result_set.rows.push(DbRow::new(column_names.clone(), values));
    }

    Ok(result_set)
}

/// Execute a DML or DDL statement.
///
/// Postgres has no connection-level insert id; callers who need generated
/// keys should use a `RETURNING` clause through the select path.
pub(crate) async fn execute_dml(
    pg_client: &Object,
    query: &str,
    params: &[RowValues],
) -> Result<WriteResult, SqlCrudError> {
    let params = Params::convert(params);
    let stmt = pg_client.prepare(query).await?;
    let rows_affected = pg_client.execute(&stmt, params.as_refs()).await?;

    Ok(WriteResult {
        rows_affected,
        last_insert_id: None,
    })
}

/// Extract a [`RowValues`] from a `tokio_postgres` row at the given index.
fn extract_value(row: &tokio_postgres::Row, idx: usize) -> Result<RowValues, SqlCrudError> {
    let type_name = row.columns()[idx].type_().name();

    match type_name {
        "int2" => {
            let val: Option<i16> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))))
        }
        "int4" => {
            let val: Option<i32> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))))
        }
        "int8" => {
            let val: Option<i64> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Int))
        }
        "float4" => {
            let val: Option<f32> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Float(f64::from(v))))
        }
        "float8" => {
            let val: Option<f64> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Float))
        }
        "bool" => {
            let val: Option<bool> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Bool))
        }
        "timestamp" | "timestamptz" => {
            let val: Option<NaiveDateTime> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Timestamp))
        }
        "json" | "jsonb" => {
            let val: Option<Value> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::JSON))
        }
        "bytea" => {
            let val: Option<Vec<u8>> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Blob))
        }
        // text, varchar, char, name, and anything else stringly typed
        _ => {
            let val: Option<String> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Text))
        }
    }
}
