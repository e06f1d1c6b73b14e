//! # axum-table-editor
//!
//! A schema-agnostic web editor for SQLite tables, easily integrable as an Axum router.
//!
//! ## Features
//!
//! - Tables and columns discovered from the catalog on every request
//! - Grid, list and compact row layouts
//! - Search across every column and sorting by any column
//! - Generic add, edit and delete forms, one text field per column
//!
//! ## Security Warning
//!
//! **This is a development tool only!**
//!
//! - No authentication/authorization built-in
//! - Exposes and allows modifying every row of every table
//! - Should never be exposed in production or public networks
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use axum_table_editor::TableEditorLayer;
//! use sqlx::SqlitePool;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pool = SqlitePool::connect("sqlite:db/personal_data.db")
//!         .await
//!         .unwrap();
//!
//!     let app = Router::new()
//!         .route("/hello", get(|| async { "Hello, World!" }))
//!         .merge(TableEditorLayer::sqlite("/tables", pool).into_router());
//!
//!     // Serve the application...
//! }
//! ```

// Public modules
pub mod api;
pub mod assets;
pub mod database;
pub mod layer;
pub mod query;
pub mod render;
pub mod schema;

// Public exports
pub use layer::TableEditorLayer;
pub use schema::{ColumnInfo, Field, Row, RowForm, RowQuery, RowSet, SortDirection, ViewMode};

// Re-export database providers
pub use database::sqlite::SqliteProvider;
pub use database::traits::{DatabaseError, DatabaseProvider};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Request-level error type
///
/// Responses built from it carry an [`ErrorMessage`] extension, which the
/// router turns into a full HTML error page.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// User-facing message attached to error responses
#[derive(Debug, Clone)]
pub struct ErrorMessage(pub String);

impl Error {
    /// Status code and the message that is safe to show to the user
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Error::Database(DatabaseError::TableNotFound(_)) | Error::NotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            Error::Database(DatabaseError::InvalidQuery(_)) | Error::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Error::Database(DatabaseError::Query(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "The database rejected the request.".to_string(),
            ),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "request rejected");
        }

        let mut response = (status, message.clone()).into_response();
        response.extensions_mut().insert(ErrorMessage(message));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryError;

    #[test]
    fn test_error_status_mapping() {
        let not_found = Error::Database(DatabaseError::TableNotFound("gifts".to_string()));
        assert_eq!(not_found.status_and_message().0, StatusCode::NOT_FOUND);

        let invalid = Error::Database(DatabaseError::InvalidQuery(QueryError::IdentifierRequired(
            "id".to_string(),
        )));
        assert_eq!(invalid.status_and_message().0, StatusCode::BAD_REQUEST);

        let bad_request = Error::BadRequest("nope".to_string());
        assert_eq!(bad_request.status_and_message().0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_database_failures_hide_details() {
        let error = Error::Database(DatabaseError::Query("datatype mismatch".to_string()));
        let (status, message) = error.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("datatype mismatch"));
    }

    #[test]
    fn test_error_response_carries_message() {
        let response = Error::NotFound("Row id 'abc'".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let message = response.extensions().get::<ErrorMessage>().unwrap();
        assert_eq!(message.0, "Not found: Row id 'abc'");
    }
}
