//! Lightweight async CRUD helpers over deadpool-managed `PostgreSQL` and
//! `SQLite` connections.
//!
//! The crate is a thin convenience layer: builders turn table names, field
//! lists, and ordered condition maps into parameterized SQL, and a
//! [`DbClient`] dispatches each statement through a shared pool, one
//! connection per statement. There is no query planner, no transaction
//! surface, and no retry logic; the drivers underneath stay in charge of
//! everything else.
//!
//! ```rust,no_run
//! use sql_crud::prelude::*;
//!
//! # async fn demo() -> Result<(), SqlCrudError> {
//! let db = DbClient::connect_sqlite("app.db", None).await?;
//!
//! db.insert(
//!     "users",
//!     &ColumnMap::new().set("name", "a").set("email", "x@y.com"),
//! )
//! .await?;
//!
//! let row = db
//!     .first("users", vec!["id", "name"], &ColumnMap::new().set("name", "a"), None)
//!     .await?;
//! # let _ = row;
//! # Ok(())
//! # }
//! ```
//!
//! Free-form SQL fragments (`tables_and_join`, field projections, the
//! `additional` clause) are trusted verbatim and must not carry untrusted
//! input; only discrete table and column name arguments are quoted.

pub mod builder;
pub mod client;
pub mod config;
pub mod crud;
pub mod error;
pub mod ident;
pub mod map;
pub mod pool;
pub mod prelude;
pub mod results;
pub mod translate;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use client::DbClient;
pub use config::DbConfig;
pub use error::{OrLog, SqlCrudError};
pub use map::{ColumnMap, FieldList};
pub use pool::{DbPool, DbPoolConnection};
pub use results::{CountedRows, DbRow, ResultSet};
pub use types::{DatabaseType, RowValues, WriteResult};
