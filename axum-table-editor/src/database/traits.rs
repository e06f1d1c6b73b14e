//! Database provider trait
//!
//! This trait defines the interface that all database implementations must provide.

use crate::query::QueryError;
use crate::schema::{ColumnInfo, Row, RowForm, RowQuery, RowSet};
use async_trait::async_trait;
use thiserror::Error;

/// Database provider trait for schema discovery, row access and row mutation
///
/// Every method that takes a table name must reject names that are not in
/// [`DatabaseProvider::list_tables`] before building any SQL.
#[async_trait]
pub trait DatabaseProvider: Send + Sync + 'static {
    /// List all user table names, in catalog order
    async fn list_tables(&self) -> Result<Vec<String>, DatabaseError>;

    /// List the columns of a table in declaration order
    ///
    /// # Errors
    ///
    /// [`DatabaseError::TableNotFound`] if the table does not exist
    async fn list_columns(&self, table: &str) -> Result<Vec<ColumnInfo>, DatabaseError>;

    /// Fetch the rows of a table, searched and sorted according to `query`
    async fn fetch_rows(&self, table: &str, query: &RowQuery) -> Result<RowSet, DatabaseError>;

    /// Fetch a single row by identifier, together with the table's columns
    async fn fetch_row(
        &self,
        table: &str,
        id: i64,
    ) -> Result<(Vec<ColumnInfo>, Option<Row>), DatabaseError>;

    /// Insert a row built from submitted form values
    ///
    /// # Returns
    ///
    /// Number of rows affected
    async fn insert_row(&self, table: &str, form: &RowForm) -> Result<u64, DatabaseError>;

    /// Overwrite every column of the row identified by `id`
    async fn update_row(&self, table: &str, id: i64, form: &RowForm) -> Result<u64, DatabaseError>;

    /// Delete the row identified by `id`
    async fn delete_row(&self, table: &str, id: i64) -> Result<u64, DatabaseError>;

    /// Cheap connectivity probe
    async fn ping(&self) -> Result<(), DatabaseError>;
}

/// Database error type
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Generic database error
    #[error("Database error: {0}")]
    Query(String),

    /// Table not found
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// A statement could not be built for the table
    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] QueryError),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        DatabaseError::Query(error.to_string())
    }
}
