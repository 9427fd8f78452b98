#[cfg(feature = "postgres")]
use deadpool_postgres::{Object as PostgresObject, Pool as DeadpoolPostgresPool};

#[cfg(feature = "sqlite")]
use deadpool_sqlite::{Object as SqliteObject, Pool as DeadpoolSqlitePool};

use crate::error::SqlCrudError;
use crate::types::DatabaseType;

/// Connection pool for database access
///
/// This enum wraps the connection pool types for the supported database
/// engines.
#[derive(Debug, Clone)]
pub enum DbPool {
    /// `PostgreSQL` connection pool
    #[cfg(feature = "postgres")]
    Postgres(DeadpoolPostgresPool),
    /// `SQLite` connection pool
    #[cfg(feature = "sqlite")]
    Sqlite(DeadpoolSqlitePool),
}

/// A connection checked out of a [`DbPool`].
///
/// Dropping the connection returns it to the pool; every helper holds one
/// for exactly one statement.
#[derive(Debug)]
pub enum DbPoolConnection {
    #[cfg(feature = "postgres")]
    Postgres(PostgresObject),
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteObject),
}

impl DbPool {
    pub fn database_type(&self) -> DatabaseType {
        match self {
            #[cfg(feature = "postgres")]
            DbPool::Postgres(_) => DatabaseType::Postgres,
            #[cfg(feature = "sqlite")]
            DbPool::Sqlite(_) => DatabaseType::Sqlite,
        }
    }

    /// Check a single connection out of the pool.
    ///
    /// Fails with the pool's own error when no connection is available
    /// within the driver-level timeout; this layer adds no retries.
    pub async fn get_connection(&self) -> Result<DbPoolConnection, SqlCrudError> {
        match self {
            #[cfg(feature = "postgres")]
            DbPool::Postgres(pool) => {
                let conn: PostgresObject = pool
                    .get()
                    .await
                    .map_err(SqlCrudError::PoolErrorPostgres)?;
                Ok(DbPoolConnection::Postgres(conn))
            }
            #[cfg(feature = "sqlite")]
            DbPool::Sqlite(pool) => {
                let conn: SqliteObject = pool
                    .get()
                    .await
                    .map_err(SqlCrudError::PoolErrorSqlite)?;
                Ok(DbPoolConnection::Sqlite(conn))
            }
        }
    }
}
