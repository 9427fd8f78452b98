use std::sync::Mutex;

use crate::error::SqlCrudError;
use crate::pool::{DbPool, DbPoolConnection};
use crate::results::ResultSet;
use crate::translate::{self, PlaceholderStyle};
use crate::types::{DatabaseType, RowValues, WriteResult};

/// Shared handle over a connection pool plus the last-query diagnostic.
///
/// Every operation checks out one connection, runs one statement, and
/// returns the connection on drop. No transactions are exposed at this
/// layer, and nothing is retried; a failure surfaces (or is collapsed by
/// [`crate::OrLog::or_log`]) exactly once.
///
/// Clone-cheapness lives in the pool itself; share a client with `Arc` when
/// multiple tasks dispatch through it.
#[derive(Debug)]
pub struct DbClient {
    pool: DbPool,
    last_query: Mutex<String>,
}

impl DbClient {
    pub(crate) fn from_pool(pool: DbPool) -> Self {
        Self {
            pool,
            last_query: Mutex::new(String::new()),
        }
    }

    pub fn database_type(&self) -> DatabaseType {
        self.pool.database_type()
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// The most recently dispatched statement with parameter literals
    /// substituted in.
    ///
    /// Diagnostic only: concurrent calls through one client overwrite it in
    /// whatever order their dispatches land, so a caller must not expect to
    /// read back its own statement under load.
    pub fn last_query(&self) -> String {
        self.last_query
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }

    pub fn set_last_query(&self, query: impl Into<String>) {
        if let Ok(mut last) = self.last_query.lock() {
            *last = query.into();
        }
    }

    fn remember(&self, sql: &str, params: &[RowValues]) {
        self.set_last_query(translate::substitute_params(sql, params));
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        match self.database_type() {
            DatabaseType::Postgres => PlaceholderStyle::Postgres,
            DatabaseType::Sqlite => PlaceholderStyle::Sqlite,
        }
    }

    /// Execute a statement that returns rows.
    ///
    /// Placeholders may be written in either `?N` or `$N` style; they are
    /// translated to the backend's style before dispatch. Errors propagate
    /// unmodified.
    pub async fn query(
        &self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlCrudError> {
        let sql = translate::translate_placeholders(sql, self.placeholder_style());
        tracing::debug!(statement = %sql, params = params.len(), "dispatching query");
        self.remember(&sql, params);

        let conn = self.pool.get_connection().await?;
        match conn {
            #[cfg(feature = "postgres")]
            DbPoolConnection::Postgres(pg) => crate::postgres::execute_select(&pg, &sql, params).await,
            #[cfg(feature = "sqlite")]
            DbPoolConnection::Sqlite(lite) => crate::sqlite::execute_select(&lite, &sql, params).await,
        }
    }

    /// Execute a DML or DDL statement and report rows affected (plus the
    /// insert id where the backend has one).
    pub async fn execute(
        &self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<WriteResult, SqlCrudError> {
        let sql = translate::translate_placeholders(sql, self.placeholder_style());
        tracing::debug!(statement = %sql, params = params.len(), "dispatching statement");
        self.remember(&sql, params);

        let conn = self.pool.get_connection().await?;
        match conn {
            #[cfg(feature = "postgres")]
            DbPoolConnection::Postgres(pg) => crate::postgres::execute_dml(&pg, &sql, params).await,
            #[cfg(feature = "sqlite")]
            DbPoolConnection::Sqlite(lite) => crate::sqlite::execute_dml(&lite, &sql, params).await,
        }
    }
}
