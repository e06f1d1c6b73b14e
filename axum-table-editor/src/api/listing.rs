//! Table listing page and health probe

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
};

use super::EditorState;
use crate::database::traits::DatabaseProvider;
use crate::render::views::ListingContext;
use crate::render::{render_index_page, render_view, IndexPage};
use crate::schema::{ListingParams, RowQuery};
use crate::Result;

/// Handler for GET /
///
/// Renders the table navigation plus the selected table's rows.
///
/// Query parameters (all optional):
/// - table: Table to show (default: first table in the catalog)
/// - view: "grid", "list" or "compact" (default: grid)
/// - sort: Column to sort by; ignored unless it names a column of the table
/// - direction: "asc" or "desc" (default: asc)
/// - search: Text matched with LIKE against every column
pub async fn index_handler<DB: DatabaseProvider>(
    State(state): State<EditorState<DB>>,
    Query(params): Query<ListingParams>,
) -> Result<Html<String>> {
    let tables = state.database.list_tables().await?;
    let current_table = params
        .table
        .clone()
        .filter(|table| !table.is_empty())
        .or_else(|| tables.first().cloned());
    let query = RowQuery::from(&params);

    let table_html = match current_table.as_deref() {
        Some(table) => {
            let rows = state.database.fetch_rows(table, &query).await?;
            tracing::debug!(table, rows = rows.rows.len(), view = query.view.as_param(), "rendering listing");
            let context = ListingContext {
                links: state.links(),
                table,
                query: &query,
            };
            render_view(query.view, &rows, &context)
        }
        None => String::new(),
    };

    let page = IndexPage {
        links: state.links(),
        tables: &tables,
        current_table: current_table.as_deref(),
        query: &query,
        table_html,
    };
    Ok(Html(render_index_page(&page)))
}

/// Handler for GET /health
///
/// 200 when the database answers a trivial query, 503 otherwise.
pub async fn health_handler<DB: DatabaseProvider>(
    State(state): State<EditorState<DB>>,
) -> (StatusCode, &'static str) {
    match state.database.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(error) => {
            tracing::warn!(%error, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "database unavailable")
        }
    }
}
