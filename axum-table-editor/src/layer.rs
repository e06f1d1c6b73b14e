//! TableEditorLayer - Main Axum integration layer
//!
//! This module provides the main entry point for integrating axum-table-editor
//! into an Axum application.

use crate::api::{
    add_row_form_handler, add_row_handler, delete_row_handler, edit_row_handler,
    health_handler, index_handler, update_row_handler, EditorState,
};
use crate::assets::serve_static_asset;
use crate::database::sqlite::SqliteProvider;
use crate::database::traits::DatabaseProvider;
use crate::render::{render_error_page, Links};
use crate::ErrorMessage;
use axum::{
    extract::State,
    middleware,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Main layer for integrating the table editor into an Axum application
///
/// # Example
///
/// ```rust,no_run
/// use axum::Router;
/// use axum_table_editor::TableEditorLayer;
/// use sqlx::SqlitePool;
///
/// # async fn example() {
/// let pool = SqlitePool::connect("sqlite:db/personal_data.db").await.unwrap();
/// let editor = TableEditorLayer::sqlite("/tables", pool);
/// let app = Router::new().merge(editor.into_router());
/// # }
/// ```
pub struct TableEditorLayer<DB: DatabaseProvider> {
    base_path: String,
    database: Arc<DB>,
}

impl<DB: DatabaseProvider> TableEditorLayer<DB> {
    /// Create a new table editor at the given base path
    ///
    /// # Arguments
    ///
    /// * `base_path` - The URL path where the editor will be mounted (e.g., "/tables"),
    ///   or "" to mount it at the root. A trailing slash is ignored.
    /// * `database` - The database provider implementation
    pub fn new(base_path: impl Into<String>, database: DB) -> Self {
        let base_path = base_path.into().trim_end_matches('/').to_string();
        Self {
            base_path,
            database: Arc::new(database),
        }
    }

    /// Convert into an Axum Router that can be merged
    ///
    /// The returned router includes:
    /// - The listing page at `{base_path}/`
    /// - Row forms and mutations at `{base_path}/add_row/...`, `/edit_row/...`,
    ///   `/update_row/...` and `/delete_row/...`
    /// - Embedded assets at `{base_path}/static/*`
    /// - A health probe at `{base_path}/health`
    /// - Request tracing and HTML error pages
    pub fn into_router(self) -> Router {
        let state = EditorState::new(self.database, self.base_path.clone());
        let base_path = state.base_path.clone();

        let routes = Router::new()
            .route("/", get(index_handler::<DB>))
            .route("/health", get(health_handler::<DB>))
            .route("/edit_row/{table}/{id}", get(edit_row_handler::<DB>))
            .route("/update_row/{table}/{id}", post(update_row_handler::<DB>))
            .route("/delete_row/{table}/{id}", post(delete_row_handler::<DB>))
            .route(
                "/add_row/{table}",
                get(add_row_form_handler::<DB>).post(add_row_handler::<DB>),
            )
            .route("/static/{*path}", get(serve_static_asset))
            .with_state(state);

        let router = if self.base_path.is_empty() {
            routes
        } else {
            Router::new().nest(&self.base_path, routes)
        };

        router
            .layer(middleware::map_response_with_state(
                base_path,
                render_error_pages,
            ))
            .layer(TraceLayer::new_for_http())
    }
}

impl TableEditorLayer<SqliteProvider> {
    /// Create a new table editor for SQLite
    ///
    /// # Arguments
    ///
    /// * `base_path` - The URL path where the editor will be mounted
    /// * `pool` - The SQLite connection pool
    pub fn sqlite(base_path: impl Into<String>, pool: sqlx::SqlitePool) -> Self {
        Self::new(base_path, SqliteProvider::new(pool))
    }
}

/// Replace the body of error responses with a full HTML error page
async fn render_error_pages(State(base_path): State<Arc<String>>, mut response: Response) -> Response {
    match response.extensions_mut().remove::<ErrorMessage>() {
        Some(ErrorMessage(message)) => {
            let status = response.status();
            let html = render_error_page(&Links::new(&base_path), status, &message);
            (status, Html(html)).into_response()
        }
        None => response,
    }
}
