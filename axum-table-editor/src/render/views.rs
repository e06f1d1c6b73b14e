//! Grid, list and compact row layouts

use super::{escape, Links};
use crate::schema::{CellValue, Row, RowQuery, RowSet, SortDirection, ViewMode};
use std::fmt::Write;

/// Number of columns the compact view shows
pub const COMPACT_COLUMNS: usize = 3;

/// Where the rendered rows live and how they were queried
pub struct ListingContext<'a> {
    pub links: Links<'a>,
    pub table: &'a str,
    pub query: &'a RowQuery,
}

/// Render rows in the layout selected by `view`
pub fn render_view(view: ViewMode, rows: &RowSet, context: &ListingContext<'_>) -> String {
    match view {
        ViewMode::Grid => render_grid(rows, context),
        ViewMode::List => render_list(rows, context),
        ViewMode::Compact => render_compact(rows, context),
    }
}

fn render_cell(value: &CellValue) -> String {
    match value {
        Some(text) => escape(text),
        None => "<span class=\"null\">NULL</span>".to_string(),
    }
}

/// Edit link and delete button for a row, addressed by its first value
fn render_actions(row: &Row, context: &ListingContext<'_>, button_class: &str) -> String {
    let Some(id) = row.id() else {
        return String::new();
    };
    format!(
        r#"<a class="btn btn-sm btn-primary {class}" href="{edit}">Edit</a>
                    <form class="delete-form" method="post" action="{delete}">
                        <button type="submit" class="btn btn-sm btn-danger {class}">Delete</button>
                    </form>"#,
        class = button_class,
        edit = escape(&context.links.edit_row(context.table, id)),
        delete = escape(&context.links.delete_row(context.table, id)),
    )
}

/// Query for the sort toggle of `column`
///
/// Clicking the active column flips its direction; any other column starts
/// ascending.
fn sort_toggle(query: &RowQuery, column: &str) -> RowQuery {
    let direction = if query.sort.as_deref() == Some(column) {
        query.direction.flipped()
    } else {
        SortDirection::Ascending
    };
    RowQuery {
        sort: Some(column.to_string()),
        direction,
        ..query.clone()
    }
}

fn render_grid(rows: &RowSet, context: &ListingContext<'_>) -> String {
    let mut html = String::from("        <table class=\"table table-striped table-bordered\">\n");

    html.push_str("            <thead><tr>\n");
    for column in rows.column_names() {
        let indicator = if context.query.sort.as_deref() == Some(column) {
            context.query.direction.indicator()
        } else {
            ""
        };
        let target = sort_toggle(context.query, column);
        let _ = writeln!(
            html,
            r#"                <th><span>{name}</span> <a class="sort-toggle" href="{href}" title="Sort by {name}">{indicator}</a></th>"#,
            name = escape(column),
            href = escape(&context.links.listing(context.table, &target)),
            indicator = indicator,
        );
    }
    html.push_str("                <th>Actions</th>\n            </tr></thead>\n");

    html.push_str("            <tbody>\n");
    for row in &rows.rows {
        html.push_str("                <tr>");
        for value in &row.values {
            let _ = write!(html, "<td>{}</td>", render_cell(value));
        }
        let _ = writeln!(html, "<td>{}</td></tr>", render_actions(row, context, ""));
    }
    html.push_str("            </tbody>\n        </table>\n");
    html
}

fn render_list(rows: &RowSet, context: &ListingContext<'_>) -> String {
    let columns = rows.column_names();
    let mut html = String::from("        <div class=\"list-view\">\n");

    for row in &rows.rows {
        html.push_str("            <div class=\"card\">\n                <div class=\"card-fields\">\n");
        for (index, value) in row.values.iter().enumerate() {
            let name = columns.get(index).copied().unwrap_or("");
            let _ = writeln!(
                html,
                "                    <div class=\"field\"><strong>{}:</strong> {}</div>",
                escape(name),
                render_cell(value)
            );
        }
        let _ = writeln!(
            html,
            "                </div>\n                <div class=\"card-actions\">\n                    {}\n                </div>\n            </div>",
            render_actions(row, context, "")
        );
    }

    html.push_str("        </div>\n");
    html
}

fn render_compact(rows: &RowSet, context: &ListingContext<'_>) -> String {
    let mut html = String::from("        <table class=\"table table-sm table-bordered table-hover\">\n");

    html.push_str("            <thead><tr>");
    for column in rows.column_names().into_iter().take(COMPACT_COLUMNS) {
        let _ = write!(html, "<th>{}</th>", escape(column));
    }
    html.push_str("<th>Actions</th></tr></thead>\n");

    html.push_str("            <tbody>\n");
    for row in &rows.rows {
        html.push_str("                <tr>");
        for value in row.values.iter().take(COMPACT_COLUMNS) {
            let _ = write!(html, "<td>{}</td>", render_cell(value));
        }
        let _ = writeln!(html, "<td>{}</td></tr>", render_actions(row, context, "btn-xs"));
    }
    html.push_str("            </tbody>\n        </table>\n");
    html
}
