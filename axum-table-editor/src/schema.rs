//! Schema types for dynamic database introspection
//!
//! These types represent table metadata discovered at runtime and the rows
//! fetched from those tables. Every value is carried as raw text; nothing here
//! knows about the declared SQL types beyond their names.

use serde::Deserialize;
use std::collections::HashMap;

/// Information about a single column, as reported by the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,

    /// Declared SQL type (e.g., "INTEGER", "TEXT", "VARCHAR(255)"), possibly empty
    pub data_type: String,

    /// Whether this column is part of the primary key
    pub is_primary_key: bool,

    /// Whether the database assigns this column's value on insert
    ///
    /// In SQLite this holds for a table's sole `INTEGER PRIMARY KEY` column,
    /// which aliases the rowid.
    pub auto_assigned: bool,
}

impl ColumnInfo {
    /// Create a plain column with no key information
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            is_primary_key: false,
            auto_assigned: false,
        }
    }
}

/// A single stringified cell; `None` stands for SQL NULL
pub type CellValue = Option<String>;

/// One fetched row, positionally aligned with its table's columns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub values: Vec<CellValue>,
}

impl Row {
    pub fn new(values: Vec<CellValue>) -> Self {
        Self { values }
    }

    /// The row identifier: the value of the first column
    pub fn id(&self) -> Option<&str> {
        self.values.first().and_then(|value| value.as_deref())
    }

    /// Value at `index` as text, with NULL and missing cells rendered empty
    pub fn text(&self, index: usize) -> &str {
        self.values
            .get(index)
            .and_then(|value| value.as_deref())
            .unwrap_or("")
    }

    /// Pair each value with the column it belongs to
    pub fn fields(&self, columns: &[ColumnInfo]) -> Vec<Field> {
        columns
            .iter()
            .enumerate()
            .map(|(index, column)| Field {
                name: column.name.clone(),
                raw_value: self.text(index).to_string(),
            })
            .collect()
    }
}

/// Rows of a table together with the columns they were read against
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    pub columns: Vec<ColumnInfo>,
    pub rows: Vec<Row>,
}

impl RowSet {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }
}

/// A named raw text value, independent of the column's declared type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub raw_value: String,
}

/// Row rendering layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
    Compact,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Grid, ViewMode::List, ViewMode::Compact];

    /// Parse the `view` query parameter; anything unrecognised is a grid
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("list") => ViewMode::List,
            Some("compact") => ViewMode::Compact,
            _ => ViewMode::Grid,
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
            ViewMode::Compact => "compact",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Grid => "Grid",
            ViewMode::List => "List",
            ViewMode::Compact => "Compact",
        }
    }
}

/// Sort order for row queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Parse the `direction` query parameter; anything other than `desc` is ascending
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some(direction) if direction.eq_ignore_ascii_case("desc") => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Glyph shown next to the active sort column
    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

/// Raw query parameters of the listing page
///
/// Everything is optional and kept as text so that malformed values degrade
/// to defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingParams {
    pub table: Option<String>,
    pub view: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub search: Option<String>,
}

/// Normalised view/sort/search parameters for fetching rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowQuery {
    pub view: ViewMode,

    /// Requested sort column; only honoured if it names a real column
    pub sort: Option<String>,

    pub direction: SortDirection,

    /// Trimmed, non-empty search text
    pub search: Option<String>,
}

impl From<&ListingParams> for RowQuery {
    fn from(params: &ListingParams) -> Self {
        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        Self {
            view: ViewMode::from_param(params.view.as_deref()),
            sort: params.sort.clone().filter(|sort| !sort.is_empty()),
            direction: SortDirection::from_param(params.direction.as_deref()),
            search: non_empty(&params.search),
        }
    }
}

/// Submitted form body: column name to raw text
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RowForm {
    pub values: HashMap<String, String>,
}

impl RowForm {
    /// Submitted value for `column`, or the empty string when the field is missing
    pub fn value(&self, column: &str) -> &str {
        self.values.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn has_value(&self, column: &str) -> bool {
        !self.value(column).is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RowForm {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}
