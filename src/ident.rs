//! Quoting for discrete table and column name arguments.
//!
//! Only names passed as standalone arguments are escaped; free-form SQL
//! fragments (`tables_and_join`, field projections, additional clauses) are
//! trusted verbatim. That trust boundary is part of the API contract.

use crate::error::SqlCrudError;

/// Quote a single identifier with `"`, doubling any embedded quotes.
///
/// Both PostgreSQL and SQLite accept this form. Empty names and names
/// containing NUL are rejected.
pub fn quote(name: &str) -> Result<String, SqlCrudError> {
    if name.is_empty() {
        return Err(SqlCrudError::ParameterError(
            "empty identifier".to_string(),
        ));
    }
    if name.contains('\0') {
        return Err(SqlCrudError::ParameterError(
            "identifier cannot contain NUL".to_string(),
        ));
    }

    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for ch in name.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
    Ok(out)
}
