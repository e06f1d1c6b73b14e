//! HTTP endpoints
//!
//! This module contains the page and form handlers of the table editor.

use std::sync::Arc;

use crate::database::traits::DatabaseProvider;
use crate::render::Links;

pub mod listing;
pub mod rows;

// Re-export handlers for convenience
pub use listing::{health_handler, index_handler};
pub use rows::{
    add_row_form_handler, add_row_handler, delete_row_handler, edit_row_handler,
    update_row_handler,
};

/// Shared handler state: the database and the path the editor is mounted at
pub struct EditorState<DB: DatabaseProvider> {
    pub database: Arc<DB>,
    pub base_path: Arc<String>,
}

impl<DB: DatabaseProvider> EditorState<DB> {
    pub fn new(database: Arc<DB>, base_path: impl Into<String>) -> Self {
        Self {
            database,
            base_path: Arc::new(base_path.into()),
        }
    }

    pub fn links(&self) -> Links<'_> {
        Links::new(&self.base_path)
    }
}

// Manual impl: DB itself need not be Clone
impl<DB: DatabaseProvider> Clone for EditorState<DB> {
    fn clone(&self) -> Self {
        Self {
            database: self.database.clone(),
            base_path: self.base_path.clone(),
        }
    }
}
