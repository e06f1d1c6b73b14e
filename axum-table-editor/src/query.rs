//! Generic SQL construction from introspected identifiers
//!
//! Identifiers can't be bound as parameters, so every table and column name
//! that reaches SQL text here must come from catalog introspection and is
//! double-quote escaped on top of that. User input only ever travels as bound
//! parameters, with the sole exception of the sort column, which is matched
//! against the introspected column list before use.

use crate::schema::{ColumnInfo, RowForm, RowQuery};
use thiserror::Error;

/// A value bound to a positional `?` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Text(String),
    Integer(i64),
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Text(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Text(value)
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Param::Integer(value)
    }
}

/// SQL text plus its positional parameters, in placeholder order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<Param>,
}

impl BuiltQuery {
    fn new(sql: String, params: Vec<Param>) -> Self {
        Self { sql, params }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The table reported no columns, so it has no identifier column
    #[error("Table has no columns: {0}")]
    NoColumns(String),

    /// Insert without a value for an identifier the database won't assign
    #[error("Column '{0}' is not assigned by the database and requires a value")]
    IdentifierRequired(String),
}

/// Quote an identifier (table or column name)
///
/// SQLite uses double quotes for identifiers. Embedded double quotes are
/// escaped by doubling them.
pub fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// Escape `\`, `%` and `_` so `text` matches literally under `ESCAPE '\'`
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        if matches!(character, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(character);
    }
    escaped
}

/// The column used to address single rows: always the first one
pub fn identifier_column<'a>(table: &str, columns: &'a [ColumnInfo]) -> Result<&'a ColumnInfo, QueryError> {
    columns
        .first()
        .ok_or_else(|| QueryError::NoColumns(table.to_string()))
}

/// Build the listing query for a table
///
/// Search ORs one `LIKE` predicate per column, each bound to `%search%` with
/// the wildcards in `search` itself escaped, so it matches as a substring.
/// Sorting is applied only when the requested column is one of `columns`
/// (exact, case-sensitive match); any other sort column is ignored.
pub fn build_select(table: &str, columns: &[ColumnInfo], query: &RowQuery) -> BuiltQuery {
    let mut sql = format!("SELECT * FROM {}", quote_identifier(table));
    let mut params = Vec::new();

    if let Some(search) = query.search.as_deref().filter(|_| !columns.is_empty()) {
        let pattern = format!("%{}%", escape_like(search));
        let conditions: Vec<String> = columns
            .iter()
            .map(|column| format!("{} LIKE ? ESCAPE '\\'", quote_identifier(&column.name)))
            .collect();
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" OR "));
        params.extend(columns.iter().map(|_| Param::Text(pattern.clone())));
    }

    let sort_column = query
        .sort
        .as_deref()
        .and_then(|sort| columns.iter().find(|column| column.name == sort));
    if let Some(column) = sort_column {
        sql.push_str(&format!(
            " ORDER BY {} {}",
            quote_identifier(&column.name),
            query.direction.as_sql()
        ));
    }

    BuiltQuery::new(sql, params)
}

/// `SELECT *` for the single row whose identifier equals `id`
pub fn build_fetch_by_id(table: &str, columns: &[ColumnInfo], id: i64) -> Result<BuiltQuery, QueryError> {
    let identifier = identifier_column(table, columns)?;
    let sql = format!(
        "SELECT * FROM {} WHERE {} = ?",
        quote_identifier(table),
        quote_identifier(&identifier.name)
    );
    Ok(BuiltQuery::new(sql, vec![Param::Integer(id)]))
}

/// Build an `INSERT` with one positional parameter per column
///
/// Missing form fields are inserted as empty strings. The identifier column
/// is left out when the database assigns it and no value was submitted; if
/// the database does not assign it, a value is required.
pub fn build_insert(table: &str, columns: &[ColumnInfo], form: &RowForm) -> Result<BuiltQuery, QueryError> {
    let identifier = identifier_column(table, columns)?;
    if !identifier.auto_assigned && !form.has_value(&identifier.name) {
        return Err(QueryError::IdentifierRequired(identifier.name.clone()));
    }

    let included: Vec<&ColumnInfo> = columns
        .iter()
        .enumerate()
        .filter(|(index, column)| {
            !(*index == 0 && column.auto_assigned && !form.has_value(&column.name))
        })
        .map(|(_, column)| column)
        .collect();

    if included.is_empty() {
        let sql = format!("INSERT INTO {} DEFAULT VALUES", quote_identifier(table));
        return Ok(BuiltQuery::new(sql, Vec::new()));
    }

    let names: Vec<String> = included
        .iter()
        .map(|column| quote_identifier(&column.name))
        .collect();
    let placeholders = vec!["?"; included.len()].join(", ");
    let params = included
        .iter()
        .map(|column| Param::from(form.value(&column.name)))
        .collect();

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(table),
        names.join(", "),
        placeholders
    );
    Ok(BuiltQuery::new(sql, params))
}

/// Build `UPDATE ... SET col = ?, ... WHERE id = ?`
///
/// Every column is assigned: the submitted value, or the empty string when
/// missing. The identifier column keeps `id` unless a new value is submitted.
pub fn build_update(
    table: &str,
    columns: &[ColumnInfo],
    form: &RowForm,
    id: i64,
) -> Result<BuiltQuery, QueryError> {
    let identifier = identifier_column(table, columns)?;

    let assignments: Vec<String> = columns
        .iter()
        .map(|column| format!("{} = ?", quote_identifier(&column.name)))
        .collect();

    let mut params: Vec<Param> = columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            if index == 0 && !form.has_value(&column.name) {
                Param::Integer(id)
            } else {
                Param::from(form.value(&column.name))
            }
        })
        .collect();
    params.push(Param::Integer(id));

    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ?",
        quote_identifier(table),
        assignments.join(", "),
        quote_identifier(&identifier.name)
    );
    Ok(BuiltQuery::new(sql, params))
}

/// `DELETE FROM table WHERE id = ?`
pub fn build_delete(table: &str, columns: &[ColumnInfo], id: i64) -> Result<BuiltQuery, QueryError> {
    let identifier = identifier_column(table, columns)?;
    let sql = format!(
        "DELETE FROM {} WHERE {} = ?",
        quote_identifier(table),
        quote_identifier(&identifier.name)
    );
    Ok(BuiltQuery::new(sql, vec![Param::Integer(id)]))
}
