use thiserror::Error;

#[cfg(feature = "sqlite")]
use deadpool_sqlite::rusqlite;

/// Errors surfaced by the CRUD layer.
///
/// Driver and pool errors pass through transparently so callers can still
/// match on the underlying failure. Write helpers wrap their errors in
/// [`SqlCrudError::WriteFailed`] to carry the operation and table context.
#[derive(Debug, Error)]
pub enum SqlCrudError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PoolErrorPostgres(#[from] deadpool::managed::PoolError<tokio_postgres::Error>),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    PoolErrorSqlite(#[from] deadpool::managed::PoolError<rusqlite::Error>),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("{op} on {table} failed: {source}")]
    WriteFailed {
        op: &'static str,
        table: String,
        #[source]
        source: Box<SqlCrudError>,
    },

    #[error("Other database error: {0}")]
    Other(String),
}

impl SqlCrudError {
    pub(crate) fn write_context(self, op: &'static str, table: &str) -> Self {
        SqlCrudError::WriteFailed {
            op,
            table: table.to_string(),
            source: Box::new(self),
        }
    }
}

#[cfg(feature = "sqlite")]
impl From<deadpool_sqlite::InteractError> for SqlCrudError {
    fn from(err: deadpool_sqlite::InteractError) -> Self {
        SqlCrudError::Other(format!("SQLite interact error: {err}"))
    }
}

/// Selectable error policy for write helpers: log the failure and collapse
/// it to an absence value, the way fire-and-forget callers expect.
///
/// ```rust,no_run
/// # use sql_crud::{DbClient, ColumnMap, OrLog};
/// # async fn demo(db: &DbClient) {
/// let row = db.insert("users", &ColumnMap::new().set("name", "a")).await.or_log();
/// if row.is_none() {
///     // failure was already logged with operation and table context
/// }
/// # }
/// ```
pub trait OrLog<T> {
    /// Log the error via `tracing` and return `None` in its place.
    fn or_log(self) -> Option<T>;
}

impl<T> OrLog<T> for Result<T, SqlCrudError> {
    fn or_log(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::error!(error = %err, "write statement failed");
                None
            }
        }
    }
}
