//! Convenient imports for common functionality.
//!
//! ```rust,no_run
//! use sql_crud::prelude::*;
//! ```

pub use crate::client::DbClient;
pub use crate::config::DbConfig;
pub use crate::error::{OrLog, SqlCrudError};
pub use crate::map::{ColumnMap, FieldList};
pub use crate::results::{CountedRows, DbRow, ResultSet};
pub use crate::types::{DatabaseType, RowValues, WriteResult};
