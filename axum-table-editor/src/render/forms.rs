//! Add and edit forms
//!
//! One plain text input per column, whatever the declared type.

use super::{escape, layout, Links};
use crate::schema::{ColumnInfo, Field};
use std::fmt::Write;

fn render_input(field: &Field, attributes: &str) -> String {
    format!(
        r#"            <div class="form-field">
                <label class="form-label" for="field-{name}">{name}</label>
                <input type="text" class="form-control" id="field-{name}" name="{name}" value="{value}"{attributes}>
            </div>
"#,
        name = escape(&field.name),
        value = escape(&field.raw_value),
        attributes = attributes,
    )
}

fn render_buttons(links: &Links<'_>, table: &str, submit: &str) -> String {
    format!(
        r#"            <div class="form-actions">
                <button type="submit" class="btn btn-primary">{submit}</button>
                <a href="{cancel}" class="btn btn-secondary">Cancel</a>
            </div>
"#,
        submit = submit,
        cancel = escape(&links.table(table)),
    )
}

/// Blank form for a new row
///
/// The identifier column is disabled when the database assigns it, so the
/// browser doesn't submit it at all.
pub fn render_add_form(links: &Links<'_>, table: &str, columns: &[ColumnInfo]) -> String {
    let mut body = format!(
        "        <h2>Add New Row to {}</h2>\n        <form action=\"{}\" method=\"post\">\n",
        escape(table),
        escape(&links.add_row(table))
    );

    for (index, column) in columns.iter().enumerate() {
        let field = Field {
            name: column.name.clone(),
            raw_value: String::new(),
        };
        let attributes = if index == 0 && column.auto_assigned {
            r#" placeholder="Auto-generated" disabled"#
        } else {
            ""
        };
        body.push_str(&render_input(&field, attributes));
    }

    body.push_str(&render_buttons(links, table, "Add Row"));
    body.push_str("        </form>\n");
    layout(links, &format!("Add row to {}", table), &body)
}

/// Form pre-filled with the current values of a row
///
/// The identifier stays read-only; the update keeps addressing the row by the
/// id in the URL.
pub fn render_edit_form(links: &Links<'_>, table: &str, id: &str, fields: &[Field]) -> String {
    let mut body = format!(
        "        <h2>Edit Row in {}</h2>\n        <form action=\"{}\" method=\"post\">\n",
        escape(table),
        escape(&links.update_row(table, id))
    );

    for (index, field) in fields.iter().enumerate() {
        let attributes = if index == 0 { " readonly" } else { "" };
        body.push_str(&render_input(field, attributes));
    }

    body.push_str(&render_buttons(links, table, "Save Changes"));
    body.push_str("        </form>\n");
    layout(links, &format!("Edit row in {}", table), &body)
}

/// Shown when the row to edit does not exist
pub fn render_row_not_found(links: &Links<'_>, table: &str, id: i64) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        r#"        <div class="error-page">
            <h2>Row not found</h2>
            <p>No row with id {id} exists in {table}.</p>
            <a class="btn btn-secondary" href="{back}">Back to {table}</a>
        </div>
"#,
        id = id,
        table = escape(table),
        back = escape(&links.table(table)),
    );
    layout(links, "Row not found", &body)
}
