//! Server-side HTML rendering
//!
//! Pages are assembled from plain strings. Every piece of database content
//! (table names, column names, values) goes through [`escape`] before it is
//! written into markup, and through [`urlencoding`] before it becomes part of
//! a URL.

use crate::schema::{RowQuery, ViewMode};
use axum::http::StatusCode;
use std::fmt::Write;

pub mod forms;
pub mod views;

pub use forms::{render_add_form, render_edit_form, render_row_not_found};
pub use views::render_view;

/// Escape text for use in HTML element content and quoted attribute values
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(character),
        }
    }
    escaped
}

/// URL builder for everything the editor links to
///
/// All routes hang off the base path the router is mounted at.
#[derive(Debug, Clone)]
pub struct Links<'a> {
    pub base_path: &'a str,
}

impl<'a> Links<'a> {
    pub fn new(base_path: &'a str) -> Self {
        Self { base_path }
    }

    /// The listing page: `/` at the root, the bare base path otherwise
    pub fn index(&self) -> String {
        if self.base_path.is_empty() {
            "/".to_string()
        } else {
            self.base_path.to_string()
        }
    }

    /// Listing of `table` with no search, sort or view state
    pub fn table(&self, table: &str) -> String {
        format!("{}?table={}", self.index(), urlencoding::encode(table))
    }

    /// Listing of `table` with explicit view/sort/search state
    pub fn listing(&self, table: &str, query: &RowQuery) -> String {
        let mut url = self.table(table);
        // Writing to a String never fails
        let _ = write!(url, "&view={}", query.view.as_param());
        if let Some(sort) = &query.sort {
            let _ = write!(
                url,
                "&sort={}&direction={}",
                urlencoding::encode(sort),
                query.direction.as_param()
            );
        }
        if let Some(search) = &query.search {
            let _ = write!(url, "&search={}", urlencoding::encode(search));
        }
        url
    }

    pub fn add_row(&self, table: &str) -> String {
        format!("{}/add_row/{}", self.base_path, urlencoding::encode(table))
    }

    pub fn edit_row(&self, table: &str, id: &str) -> String {
        format!(
            "{}/edit_row/{}/{}",
            self.base_path,
            urlencoding::encode(table),
            urlencoding::encode(id)
        )
    }

    pub fn update_row(&self, table: &str, id: &str) -> String {
        format!(
            "{}/update_row/{}/{}",
            self.base_path,
            urlencoding::encode(table),
            urlencoding::encode(id)
        )
    }

    pub fn delete_row(&self, table: &str, id: &str) -> String {
        format!(
            "{}/delete_row/{}/{}",
            self.base_path,
            urlencoding::encode(table),
            urlencoding::encode(id)
        )
    }

    pub fn asset(&self, name: &str) -> String {
        format!("{}/static/{}", self.base_path, name)
    }
}

/// Wrap page content in the shared document shell
pub fn layout(links: &Links<'_>, title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Table Editor</title>
    <link rel="stylesheet" href="{css}">
    <script src="{js}" defer></script>
</head>
<body>
    <main class="container">
{body}
    </main>
</body>
</html>
"#,
        title = escape(title),
        css = links.asset("app.css"),
        js = links.asset("app.js"),
        body = body,
    )
}

/// Everything the listing page shows
pub struct IndexPage<'a> {
    pub links: Links<'a>,
    pub tables: &'a [String],
    pub current_table: Option<&'a str>,
    pub query: &'a RowQuery,
    /// Pre-rendered row view for the current table
    pub table_html: String,
}

/// Render the table navigation and the selected table's data view
pub fn render_index_page(page: &IndexPage<'_>) -> String {
    let mut body = String::from("        <h1 class=\"title\">Table Editor</h1>\n");

    body.push_str("        <nav class=\"table-nav\">\n");
    if page.tables.is_empty() {
        body.push_str("            <p class=\"empty\">This database contains no tables.</p>\n");
    }
    for table in page.tables {
        let active = if Some(table.as_str()) == page.current_table {
            " active"
        } else {
            ""
        };
        let _ = writeln!(
            body,
            "            <a class=\"nav-link{}\" href=\"{}\">{}</a>",
            active,
            escape(&page.links.table(table)),
            escape(table)
        );
    }
    body.push_str("        </nav>\n");

    if let Some(table) = page.current_table {
        let _ = writeln!(body, "        <h2>{}</h2>", escape(table));
        body.push_str(&render_controls(&page.links, table, page.query));
        body.push_str(&page.table_html);
        let _ = writeln!(
            body,
            "        <a class=\"btn btn-success\" href=\"{}\">Add New Row</a>",
            escape(&page.links.add_row(table))
        );
    }

    layout(&page.links, page.current_table.unwrap_or("Tables"), &body)
}

/// Search box and view toggle for the listing
///
/// The search form submits on its own; `app.js` adds the debounced
/// search-as-you-type on top of it.
fn render_controls(links: &Links<'_>, table: &str, query: &RowQuery) -> String {
    let mut html = String::from("        <div class=\"table-controls\">\n");

    let _ = write!(
        html,
        r#"            <form class="search-form" method="get" action="{action}">
                <input type="hidden" name="table" value="{table}">
                <input type="hidden" name="view" value="{view}">
"#,
        action = escape(&links.index()),
        table = escape(table),
        view = query.view.as_param(),
    );
    if let Some(sort) = &query.sort {
        let _ = write!(
            html,
            r#"                <input type="hidden" name="sort" value="{}">
                <input type="hidden" name="direction" value="{}">
"#,
            escape(sort),
            query.direction.as_param()
        );
    }
    let _ = write!(
        html,
        r#"                <input type="text" class="form-control" id="searchInput" name="search" placeholder="Search table..." value="{}" autocomplete="off">
            </form>
"#,
        escape(query.search.as_deref().unwrap_or(""))
    );

    html.push_str("            <div class=\"view-toggle\">\n");
    for view in ViewMode::ALL {
        let target = RowQuery {
            view,
            ..query.clone()
        };
        let class = if view == query.view {
            "btn btn-sm btn-primary active"
        } else {
            "btn btn-sm btn-outline-primary"
        };
        let _ = writeln!(
            html,
            "                <a class=\"{}\" href=\"{}\">{}</a>",
            class,
            escape(&links.listing(table, &target)),
            view.label()
        );
    }
    html.push_str("            </div>\n        </div>\n");
    html
}

/// Generic error page; `message` is shown verbatim (escaped)
pub fn render_error_page(links: &Links<'_>, status: StatusCode, message: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        r#"        <div class="error-page">
            <h1>{code} {reason}</h1>
            <p>{message}</p>
            <a class="btn btn-secondary" href="{home}">Back to tables</a>
        </div>
"#,
        code = status.as_u16(),
        reason = escape(reason),
        message = escape(message),
        home = escape(&links.index()),
    );
    layout(links, reason, &body)
}
