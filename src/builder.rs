//! Pure SQL statement builders.
//!
//! Every builder returns statement text with numbered `?N` placeholders plus
//! the parameter list in matching order; the executor translates placeholder
//! style per backend. Discrete table/column name arguments are quoted via
//! [`crate::ident::quote`]; free-form fragments (`tables_and_join`, field
//! projections, `additional`) are trusted verbatim.

use crate::error::SqlCrudError;
use crate::ident;
use crate::map::{ColumnMap, FieldList};
use crate::types::{DatabaseType, RowValues};

/// Build the filter for a condition map: `AND`-joined equality terms with
/// placeholders numbered from `start`, or `1=1` when the map is empty.
///
/// Clause order and parameter order both follow map insertion order.
pub fn condition_clause(condition: &ColumnMap, start: usize) -> (String, Vec<RowValues>) {
    if condition.is_empty() {
        return ("1=1".to_string(), Vec::new());
    }

    let clause = condition
        .keys()
        .enumerate()
        .map(|(i, name)| format!("{name} = ?{}", start + i))
        .collect::<Vec<_>>()
        .join(" AND ");

    (clause, condition.values())
}

/// `SELECT <fields> FROM <tables_and_join> WHERE <where> [<additional>]`.
pub fn prepare_select(
    tables_and_join: &str,
    fields: &FieldList,
    where_clause: &str,
    additional: Option<&str>,
) -> String {
    let mut query = format!(
        "SELECT {} FROM {tables_and_join} WHERE {where_clause}",
        fields.as_str()
    );
    if let Some(extra) = additional {
        query.push('\n');
        query.push_str(extra);
    }
    query
}

/// Select that additionally projects a window-function total count aliased
/// `<field_to_count>_count`. The windowed count covers the whole filtered
/// set, so paging in `additional` does not shrink it.
pub fn prepare_select_with_count(
    tables_and_join: &str,
    fields: &FieldList,
    field_to_count: &str,
    where_clause: &str,
    additional: Option<&str>,
) -> String {
    let mut query = format!(
        "SELECT {}, count({field_to_count}) over() AS {field_to_count}_count FROM {tables_and_join} WHERE {where_clause}",
        fields.as_str()
    );
    if let Some(extra) = additional {
        query.push('\n');
        query.push_str(extra);
    }
    query
}

/// Alias of the injected count column for a counted field.
pub fn count_alias(field_to_count: &str) -> String {
    format!("{field_to_count}_count")
}

/// `INSERT INTO "t" (<cols>) VALUES (?1, .., ?n)`.
pub fn insert_statement(
    table: &str,
    data: &ColumnMap,
) -> Result<(String, Vec<RowValues>), SqlCrudError> {
    if data.is_empty() {
        return Err(SqlCrudError::ParameterError(format!(
            "insert into {table} requires at least one column"
        )));
    }

    let columns = data.keys().collect::<Vec<_>>().join(", ");
    let placeholders = (1..=data.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");

    let query = format!(
        "INSERT INTO {} ({columns}) VALUES ({placeholders})",
        ident::quote(table)?
    );
    Ok((query, data.values()))
}

/// One multi-row `INSERT .. VALUES (..), (..), ..`.
///
/// The column list comes from the first row; every other row must carry the
/// same keys in the same order, otherwise values would bind to the wrong
/// columns. Mismatches are rejected rather than silently misaligned.
pub fn insert_many_statement(
    table: &str,
    rows: &[ColumnMap],
) -> Result<(String, Vec<RowValues>), SqlCrudError> {
    let Some(first) = rows.first() else {
        return Err(SqlCrudError::ParameterError(format!(
            "insert into {table} requires at least one row"
        )));
    };
    if first.is_empty() {
        return Err(SqlCrudError::ParameterError(format!(
            "insert into {table} requires at least one column"
        )));
    }

    let column_names: Vec<&str> = first.keys().collect();
    for (row_idx, row) in rows.iter().enumerate().skip(1) {
        let keys: Vec<&str> = row.keys().collect();
        if keys != column_names {
            return Err(SqlCrudError::ParameterError(format!(
                "insert into {table}: row {row_idx} columns {keys:?} do not match row 0 columns {column_names:?}"
            )));
        }
    }

    let width = column_names.len();
    let groups = (0..rows.len())
        .map(|row_idx| {
            let placeholders = (1..=width)
                .map(|col_idx| format!("?{}", row_idx * width + col_idx))
                .collect::<Vec<_>>()
                .join(", ");
            format!("({placeholders})")
        })
        .collect::<Vec<_>>()
        .join(", ");

    let query = format!(
        "INSERT INTO {} ({}) VALUES {groups}",
        ident::quote(table)?,
        column_names.join(", ")
    );

    // Row-major flattening matches the placeholder numbering above.
    let params = rows.iter().flat_map(ColumnMap::values).collect();
    Ok((query, params))
}

/// `UPDATE "t" SET a = ?1, .. WHERE <condition>`.
///
/// Parameter order is data values followed by condition values; the
/// placeholders are numbered across both so the concatenation is positional.
pub fn update_statement(
    table: &str,
    data: &ColumnMap,
    condition: &ColumnMap,
) -> Result<(String, Vec<RowValues>), SqlCrudError> {
    let (assignments, where_clause, params) = update_parts(table, data, condition)?;
    let query = format!(
        "UPDATE {} SET {assignments} WHERE {where_clause}",
        ident::quote(table)?
    );
    Ok((query, params))
}

/// Update constrained to a single matching row.
///
/// Neither backend supports MySQL's `UPDATE .. LIMIT 1` directly, so the
/// row is picked with a `LIMIT 1` subquery over the engine's row address
/// (`rowid` on SQLite, `ctid` on PostgreSQL).
pub fn update_first_statement(
    table: &str,
    data: &ColumnMap,
    condition: &ColumnMap,
    db_type: DatabaseType,
) -> Result<(String, Vec<RowValues>), SqlCrudError> {
    let (assignments, where_clause, params) = update_parts(table, data, condition)?;
    let quoted = ident::quote(table)?;
    let row_address = match db_type {
        DatabaseType::Postgres => "ctid",
        DatabaseType::Sqlite => "rowid",
    };
    let query = format!(
        "UPDATE {quoted} SET {assignments} WHERE {row_address} IN \
         (SELECT {row_address} FROM {quoted} WHERE {where_clause} LIMIT 1)"
    );
    Ok((query, params))
}

fn update_parts(
    table: &str,
    data: &ColumnMap,
    condition: &ColumnMap,
) -> Result<(String, String, Vec<RowValues>), SqlCrudError> {
    if data.is_empty() {
        return Err(SqlCrudError::ParameterError(format!(
            "update of {table} requires at least one assignment"
        )));
    }

    let assignments = data
        .keys()
        .enumerate()
        .map(|(i, name)| format!("{name} = ?{}", i + 1))
        .collect::<Vec<_>>()
        .join(", ");

    let (where_clause, condition_params) = condition_clause(condition, data.len() + 1);

    let mut params = data.values();
    params.extend(condition_params);
    Ok((assignments, where_clause, params))
}

/// `DELETE FROM "t" WHERE <condition>`.
pub fn delete_statement(
    table: &str,
    condition: &ColumnMap,
) -> Result<(String, Vec<RowValues>), SqlCrudError> {
    let (where_clause, params) = condition_clause(condition, 1);
    let query = format!(
        "DELETE FROM {} WHERE {where_clause}",
        ident::quote(table)?
    );
    Ok((query, params))
}

/// `DROP TABLE "t"`. Irreversible.
pub fn drop_table_statement(table: &str) -> Result<String, SqlCrudError> {
    Ok(format!("DROP TABLE {}", ident::quote(table)?))
}

/// `ALTER TABLE "t" ADD "col" <data_type>`.
///
/// `data_type` is a trusted DDL fragment and is not validated.
pub fn add_column_statement(
    table: &str,
    column: &str,
    data_type: &str,
) -> Result<String, SqlCrudError> {
    Ok(format!(
        "ALTER TABLE {} ADD {} {data_type}",
        ident::quote(table)?,
        ident::quote(column)?
    ))
}

/// `ALTER TABLE "t" RENAME COLUMN "a" TO "b"`.
pub fn rename_column_statement(
    table: &str,
    old_name: &str,
    new_name: &str,
) -> Result<String, SqlCrudError> {
    Ok(format!(
        "ALTER TABLE {} RENAME COLUMN {} TO {}",
        ident::quote(table)?,
        ident::quote(old_name)?,
        ident::quote(new_name)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_clause_has_one_term_per_key_in_order() {
        let condition = ColumnMap::new().set("a", 1).set("b", "x").set("c", true);
        let (clause, params) = condition_clause(&condition, 1);
        assert_eq!(clause, "a = ?1 AND b = ?2 AND c = ?3");
        assert_eq!(
            params,
            vec![
                RowValues::Int(1),
                RowValues::Text("x".into()),
                RowValues::Bool(true)
            ]
        );
    }

    #[test]
    fn empty_condition_is_match_all() {
        let (clause, params) = condition_clause(&ColumnMap::new(), 1);
        assert_eq!(clause, "1=1");
        assert!(params.is_empty());
    }

    #[test]
    fn select_appends_additional_clause() {
        let q = prepare_select(
            "users u JOIN roles r ON r.id = u.role_id",
            &FieldList::from(vec!["u.id", "r.name"]),
            "u.id = ?1",
            Some("ORDER BY u.id"),
        );
        assert_eq!(
            q,
            "SELECT u.id, r.name FROM users u JOIN roles r ON r.id = u.role_id WHERE u.id = ?1\nORDER BY u.id"
        );
    }

    #[test]
    fn counted_select_projects_window_count() {
        let q = prepare_select_with_count(
            "users",
            &FieldList::from("name"),
            "id",
            "1=1",
            Some("LIMIT 1"),
        );
        assert!(q.contains("count(id) over() AS id_count"));
        assert!(q.ends_with("LIMIT 1"));
    }

    #[test]
    fn insert_places_values_in_map_order() {
        let data = ColumnMap::from([("name", "a"), ("email", "x@y.com")]);
        let (q, params) = insert_statement("users", &data).unwrap();
        assert_eq!(q, "INSERT INTO \"users\" (name, email) VALUES (?1, ?2)");
        assert_eq!(
            params,
            vec![
                RowValues::Text("a".into()),
                RowValues::Text("x@y.com".into())
            ]
        );
    }

    #[test]
    fn insert_rejects_empty_data() {
        assert!(matches!(
            insert_statement("users", &ColumnMap::new()),
            Err(SqlCrudError::ParameterError(_))
        ));
    }

    #[test]
    fn insert_many_flattens_row_major() {
        let rows = vec![
            ColumnMap::from([("a", 1), ("b", 2)]),
            ColumnMap::from([("a", 3), ("b", 4)]),
        ];
        let (q, params) = insert_many_statement("t", &rows).unwrap();
        assert_eq!(
            q,
            "INSERT INTO \"t\" (a, b) VALUES (?1, ?2), (?3, ?4)"
        );
        assert_eq!(
            params,
            vec![
                RowValues::Int(1),
                RowValues::Int(2),
                RowValues::Int(3),
                RowValues::Int(4)
            ]
        );
    }

    #[test]
    fn insert_many_rejects_mismatched_rows() {
        let rows = vec![
            ColumnMap::from([("a", 1), ("b", 2)]),
            ColumnMap::from([("b", 4), ("a", 3)]),
        ];
        assert!(matches!(
            insert_many_statement("t", &rows),
            Err(SqlCrudError::ParameterError(_))
        ));
        assert!(matches!(
            insert_many_statement("t", &[]),
            Err(SqlCrudError::ParameterError(_))
        ));
    }

    #[test]
    fn update_orders_data_before_condition() {
        let data = ColumnMap::new().set("x", 1);
        let condition = ColumnMap::new().set("id", 5);
        let (q, params) = update_statement("t", &data, &condition).unwrap();
        assert_eq!(q, "UPDATE \"t\" SET x = ?1 WHERE id = ?2");
        assert_eq!(params, vec![RowValues::Int(1), RowValues::Int(5)]);
    }

    #[test]
    fn update_first_carries_single_row_limit() {
        let data = ColumnMap::new().set("x", 1);
        let condition = ColumnMap::new().set("id", 5);
        let (q, params) =
            update_first_statement("t", &data, &condition, DatabaseType::Sqlite).unwrap();
        assert!(q.contains("LIMIT 1"));
        assert!(q.contains("rowid IN"));
        assert_eq!(params, vec![RowValues::Int(1), RowValues::Int(5)]);

        let (q, _) =
            update_first_statement("t", &data, &condition, DatabaseType::Postgres).unwrap();
        assert!(q.contains("ctid IN"));
        assert!(q.contains("LIMIT 1"));
    }

    #[test]
    fn delete_with_empty_condition_matches_all_rows() {
        let (q, params) = delete_statement("t", &ColumnMap::new()).unwrap();
        assert_eq!(q, "DELETE FROM \"t\" WHERE 1=1");
        assert!(params.is_empty());
    }

    #[test]
    fn ddl_builders_quote_names() {
        assert_eq!(drop_table_statement("t").unwrap(), "DROP TABLE \"t\"");
        assert_eq!(
            add_column_statement("t", "age", "INTEGER NOT NULL DEFAULT 0").unwrap(),
            "ALTER TABLE \"t\" ADD \"age\" INTEGER NOT NULL DEFAULT 0"
        );
        assert_eq!(
            rename_column_statement("t", "old", "new").unwrap(),
            "ALTER TABLE \"t\" RENAME COLUMN \"old\" TO \"new\""
        );
    }
}
