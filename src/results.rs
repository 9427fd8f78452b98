use std::sync::Arc;

use crate::types::RowValues;

/// A row from a database query result
///
/// Column names are shared across all rows of a result set behind an `Arc`.
#[derive(Debug, Clone)]
pub struct DbRow {
    column_names: Arc<Vec<String>>,
    values: Vec<RowValues>,
}

impl DbRow {
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<RowValues>) -> Self {
        Self {
            column_names,
            values,
        }
    }

    /// The column names of this row, in projection order.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Get a value from the row by column name
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.column_names
            .iter()
            .position(|col| col == column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value from the row by column index
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }

    pub fn values(&self) -> &[RowValues] {
        &self.values
    }
}

/// A result set from a database query
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub rows: Vec<DbRow>,
}

impl ResultSet {
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            rows: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&DbRow> {
        self.rows.first()
    }

    pub fn into_first(self) -> Option<DbRow> {
        self.rows.into_iter().next()
    }

    /// Rebuild the result set without the named column.
    ///
    /// Used to strip the injected window-count column before handing rows
    /// back to the caller. Rows are unchanged when the column is absent.
    pub fn without_column(self, column_name: &str) -> ResultSet {
        let Some(first) = self.rows.first() else {
            return self;
        };
        let Some(drop_idx) = first
            .column_names
            .iter()
            .position(|col| col == column_name)
        else {
            return self;
        };

        let kept_names: Arc<Vec<String>> = Arc::new(
            first
                .column_names
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != drop_idx)
                .map(|(_, name)| name.clone())
                .collect(),
        );

        let rows = self
            .rows
            .into_iter()
            .map(|row| {
                let values = row
                    .values
                    .into_iter()
                    .enumerate()
                    .filter(|(i, _)| *i != drop_idx)
                    .map(|(_, v)| v)
                    .collect();
                DbRow::new(kept_names.clone(), values)
            })
            .collect();

        ResultSet { rows }
    }
}

/// Rows plus the total matching-row count, as returned by
/// [`crate::DbClient::find_all_with_count`].
///
/// `count` is the windowed total over the full filtered set, so it exceeds
/// `rows.len()` whenever the additional clause applies paging.
#[derive(Debug, Clone, Default)]
pub struct CountedRows {
    pub rows: Vec<DbRow>,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_set() -> ResultSet {
        let names = Arc::new(vec!["id".to_string(), "name".to_string(), "name_count".to_string()]);
        ResultSet {
            rows: vec![
                DbRow::new(
                    names.clone(),
                    vec![
                        RowValues::Int(1),
                        RowValues::Text("a".into()),
                        RowValues::Int(2),
                    ],
                ),
                DbRow::new(
                    names,
                    vec![
                        RowValues::Int(2),
                        RowValues::Text("b".into()),
                        RowValues::Int(2),
                    ],
                ),
            ],
        }
    }

    #[test]
    fn strips_named_column_from_every_row() {
        let stripped = row_set().without_column("name_count");
        assert_eq!(stripped.len(), 2);
        for row in &stripped.rows {
            assert_eq!(row.column_names(), ["id", "name"]);
            assert_eq!(row.values().len(), 2);
            assert!(row.get("name_count").is_none());
        }
        assert_eq!(stripped.rows[1].get("name").unwrap().as_text(), Some("b"));
    }

    #[test]
    fn without_column_is_noop_for_missing_column_or_empty_set() {
        let untouched = row_set().without_column("nope");
        assert_eq!(untouched.rows[0].values().len(), 3);

        let empty = ResultSet::default().without_column("name_count");
        assert!(empty.is_empty());
    }
}
