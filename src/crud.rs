//! CRUD helpers layered on [`DbClient::query`] / [`DbClient::execute`].
//!
//! Read helpers propagate failures unmodified. Write helpers wrap failures
//! with operation and table context ([`SqlCrudError::WriteFailed`]); chain
//! [`crate::OrLog::or_log`] to collapse those to an absence value with the
//! error logged.

use crate::builder;
use crate::client::DbClient;
use crate::error::SqlCrudError;
use crate::map::{ColumnMap, FieldList};
use crate::results::{CountedRows, DbRow, ResultSet};
use crate::types::{RowValues, WriteResult};

impl DbClient {
    /// Fetch the first row matching the condition map, or `None` when
    /// nothing matches. An empty result is not an error.
    ///
    /// `tables_and_join`, the field projection, and `additional` are trusted
    /// SQL fragments; a `LIMIT 1` is appended after `additional`.
    pub async fn first(
        &self,
        tables_and_join: &str,
        fields: impl Into<FieldList>,
        condition: &ColumnMap,
        additional: Option<&str>,
    ) -> Result<Option<DbRow>, SqlCrudError> {
        let (where_clause, params) = builder::condition_clause(condition, 1);
        let query = builder::prepare_select(
            tables_and_join,
            &fields.into(),
            &where_clause,
            additional,
        );
        let result = self.query(&format!("{query} LIMIT 1"), &params).await?;
        Ok(result.into_first())
    }

    /// Fetch every row matching the condition map.
    pub async fn find_all(
        &self,
        tables_and_join: &str,
        fields: impl Into<FieldList>,
        condition: &ColumnMap,
        additional: Option<&str>,
    ) -> Result<ResultSet, SqlCrudError> {
        let (where_clause, params) = builder::condition_clause(condition, 1);
        let query = builder::prepare_select(
            tables_and_join,
            &fields.into(),
            &where_clause,
            additional,
        );
        self.query(&query, &params).await
    }

    /// Fetch matching rows together with the total matching-row count.
    ///
    /// The count is a window-function total over the whole filtered set, so
    /// paging clauses in `additional` do not shrink it. The injected
    /// `<field_to_count>_count` column is stripped from the returned rows.
    /// An empty result yields `count == 0`.
    pub async fn find_all_with_count(
        &self,
        tables_and_join: &str,
        fields: impl Into<FieldList>,
        field_to_count: &str,
        condition: &ColumnMap,
        additional: Option<&str>,
    ) -> Result<CountedRows, SqlCrudError> {
        let (where_clause, params) = builder::condition_clause(condition, 1);
        let query = builder::prepare_select_with_count(
            tables_and_join,
            &fields.into(),
            field_to_count,
            &where_clause,
            additional,
        );
        let result = self.query(&query, &params).await?;

        let alias = builder::count_alias(field_to_count);
        let count = match result.first() {
            None => 0,
            Some(row) => *row
                .get(&alias)
                .and_then(RowValues::as_int)
                .ok_or_else(|| {
                    SqlCrudError::ExecutionError(format!(
                        "count column {alias} missing from result"
                    ))
                })?,
        };

        Ok(CountedRows {
            rows: result.without_column(&alias).rows,
            count,
        })
    }

    /// Insert one row; columns and values follow the map's insertion order.
    pub async fn insert(
        &self,
        table: &str,
        data: &ColumnMap,
    ) -> Result<WriteResult, SqlCrudError> {
        let run = async {
            let (query, params) = builder::insert_statement(table, data)?;
            self.execute(&query, &params).await
        };
        run.await.map_err(|e| e.write_context("insert", table))
    }

    /// Insert several rows with one multi-row statement.
    ///
    /// The column list is taken from the first row; rows whose keys differ
    /// in name or order are rejected before anything is sent.
    pub async fn insert_many(
        &self,
        table: &str,
        rows: &[ColumnMap],
    ) -> Result<WriteResult, SqlCrudError> {
        let run = async {
            let (query, params) = builder::insert_many_statement(table, rows)?;
            self.execute(&query, &params).await
        };
        run.await.map_err(|e| e.write_context("insert_many", table))
    }

    /// Update every row matching the condition map.
    ///
    /// Positional parameters are data values followed by condition values.
    pub async fn update(
        &self,
        table: &str,
        data: &ColumnMap,
        condition: &ColumnMap,
    ) -> Result<WriteResult, SqlCrudError> {
        let run = async {
            let (query, params) = builder::update_statement(table, data, condition)?;
            self.execute(&query, &params).await
        };
        run.await.map_err(|e| e.write_context("update", table))
    }

    /// Update at most one matching row; returns the affected-row count.
    pub async fn update_first(
        &self,
        table: &str,
        data: &ColumnMap,
        condition: &ColumnMap,
    ) -> Result<u64, SqlCrudError> {
        let run = async {
            let (query, params) = builder::update_first_statement(
                table,
                data,
                condition,
                self.database_type(),
            )?;
            self.execute(&query, &params).await
        };
        run.await
            .map(|result| result.rows_affected)
            .map_err(|e| e.write_context("update_first", table))
    }

    /// Delete rows matching the condition map. Matching nothing is a
    /// successful write with `rows_affected == 0`, not an error.
    pub async fn delete(
        &self,
        table: &str,
        condition: &ColumnMap,
    ) -> Result<WriteResult, SqlCrudError> {
        let run = async {
            let (query, params) = builder::delete_statement(table, condition)?;
            self.execute(&query, &params).await
        };
        run.await.map_err(|e| e.write_context("delete", table))
    }

    /// Drop the table. Irreversible.
    pub async fn drop_table(&self, table: &str) -> Result<WriteResult, SqlCrudError> {
        let run = async {
            let query = builder::drop_table_statement(table)?;
            self.execute(&query, &[]).await
        };
        run.await.map_err(|e| e.write_context("drop_table", table))
    }

    /// Add a column; `data_type` is a trusted DDL fragment.
    pub async fn add_column(
        &self,
        table: &str,
        column: &str,
        data_type: &str,
    ) -> Result<WriteResult, SqlCrudError> {
        let run = async {
            let query = builder::add_column_statement(table, column, data_type)?;
            self.execute(&query, &[]).await
        };
        run.await.map_err(|e| e.write_context("add_column", table))
    }

    /// Rename a column.
    pub async fn rename_column(
        &self,
        table: &str,
        old_name: &str,
        new_name: &str,
    ) -> Result<WriteResult, SqlCrudError> {
        let run = async {
            let query = builder::rename_column_statement(table, old_name, new_name)?;
            self.execute(&query, &[]).await
        };
        run.await
            .map_err(|e| e.write_context("rename_column", table))
    }
}
