//! Row add, edit, update and delete endpoints
//!
//! Every mutation redirects back to the table listing on success. Search,
//! sort and view state are not carried over.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use super::EditorState;
use crate::database::traits::DatabaseProvider;
use crate::render::{render_add_form, render_edit_form, render_row_not_found};
use crate::schema::RowForm;
use crate::{Error, Result};

/// Parse the row id path segment; anything but an integer is a 404
fn parse_row_id(raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .map_err(|_| Error::NotFound(format!("Row id '{}'", raw)))
}

/// Handler for GET /edit_row/{table}/{id}
///
/// Renders a form pre-filled with the row's current values, or a
/// "row not found" page (404) when no row has that id.
pub async fn edit_row_handler<DB: DatabaseProvider>(
    State(state): State<EditorState<DB>>,
    Path((table, raw_id)): Path<(String, String)>,
) -> Result<Response> {
    let id = parse_row_id(&raw_id)?;
    let (columns, row) = state.database.fetch_row(&table, id).await?;

    let links = state.links();
    let response = match row {
        Some(row) => {
            let fields = row.fields(&columns);
            Html(render_edit_form(&links, &table, &id.to_string(), &fields)).into_response()
        }
        None => {
            tracing::debug!(table = %table, id, "row to edit not found");
            (
                StatusCode::NOT_FOUND,
                Html(render_row_not_found(&links, &table, id)),
            )
                .into_response()
        }
    };
    Ok(response)
}

/// Handler for POST /update_row/{table}/{id}
///
/// Form body: one field per column. Missing fields are stored as empty
/// strings; a missing identifier keeps the row's current id.
pub async fn update_row_handler<DB: DatabaseProvider>(
    State(state): State<EditorState<DB>>,
    Path((table, raw_id)): Path<(String, String)>,
    Form(form): Form<RowForm>,
) -> Result<Redirect> {
    let id = parse_row_id(&raw_id)?;
    let affected = state.database.update_row(&table, id, &form).await?;
    tracing::info!(table = %table, id, affected, "row updated");
    Ok(Redirect::to(&state.links().table(&table)))
}

/// Handler for POST /delete_row/{table}/{id}
pub async fn delete_row_handler<DB: DatabaseProvider>(
    State(state): State<EditorState<DB>>,
    Path((table, raw_id)): Path<(String, String)>,
) -> Result<Redirect> {
    let id = parse_row_id(&raw_id)?;
    let affected = state.database.delete_row(&table, id).await?;
    tracing::info!(table = %table, id, affected, "row deleted");
    Ok(Redirect::to(&state.links().table(&table)))
}

/// Handler for GET /add_row/{table}
pub async fn add_row_form_handler<DB: DatabaseProvider>(
    State(state): State<EditorState<DB>>,
    Path(table): Path<String>,
) -> Result<Html<String>> {
    let columns = state.database.list_columns(&table).await?;
    Ok(Html(render_add_form(&state.links(), &table, &columns)))
}

/// Handler for POST /add_row/{table}
///
/// Form body: one field per column, in any order. Missing fields are
/// inserted as empty strings.
pub async fn add_row_handler<DB: DatabaseProvider>(
    State(state): State<EditorState<DB>>,
    Path(table): Path<String>,
    Form(form): Form<RowForm>,
) -> Result<Redirect> {
    let affected = state.database.insert_row(&table, &form).await?;
    tracing::info!(table = %table, affected, "row inserted");
    Ok(Redirect::to(&state.links().table(&table)))
}
