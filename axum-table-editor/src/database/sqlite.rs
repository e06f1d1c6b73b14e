//! SQLite database provider implementation

use crate::database::traits::{DatabaseError, DatabaseProvider};
use crate::query::{self, BuiltQuery, Param};
use crate::schema::{CellValue, ColumnInfo, Row, RowForm, RowQuery, RowSet};
use async_trait::async_trait;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row as _, Sqlite, SqlitePool, TypeInfo, ValueRef};

/// SQLite database provider
pub struct SqliteProvider {
    pool: SqlitePool,
}

impl SqliteProvider {
    /// Create a new SQLite provider
    ///
    /// # Arguments
    ///
    /// * `pool` - SQLite connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Reject any table name that the catalog does not list
    async fn ensure_table(&self, table: &str) -> Result<(), DatabaseError> {
        let table_exists: Option<i64> = sqlx::query_scalar(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name = ? AND name NOT LIKE 'sqlite_%'",
        )
        .bind(table)
        .fetch_optional(&self.pool)
        .await?;

        match table_exists {
            Some(_) => Ok(()),
            None => Err(DatabaseError::TableNotFound(table.to_string())),
        }
    }

    /// Bind parameters to a statement in placeholder order
    fn bind_params<'q>(
        mut statement: Query<'q, Sqlite, SqliteArguments<'q>>,
        params: &[Param],
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        for param in params {
            statement = match param {
                Param::Text(value) => statement.bind(value.clone()),
                Param::Integer(value) => statement.bind(*value),
            };
        }
        statement
    }

    async fn fetch_all(&self, built: &BuiltQuery) -> Result<Vec<Row>, DatabaseError> {
        tracing::debug!(sql = %built.sql, params = built.params.len(), "fetching rows");
        let rows = Self::bind_params(sqlx::query(&built.sql), &built.params)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::row_to_cells).collect()
    }

    async fn execute(&self, built: &BuiltQuery) -> Result<u64, DatabaseError> {
        tracing::debug!(sql = %built.sql, params = built.params.len(), "executing statement");
        let result = Self::bind_params(sqlx::query(&built.sql), &built.params)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Convert a SQLite row to text cells
    fn row_to_cells(row: &SqliteRow) -> Result<Row, DatabaseError> {
        let values = (0..row.len())
            .map(|index| Self::extract_cell(row, index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Row::new(values))
    }

    /// Extract one value as text
    ///
    /// SQLite is dynamically typed, so the storage class of the value decides
    /// the conversion, not the declared column type. Integers and reals are
    /// rendered by SQLite itself; blobs are summarised.
    fn extract_cell(row: &SqliteRow, index: usize) -> Result<CellValue, DatabaseError> {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(None);
        }

        let storage_class = raw.type_info().name().to_string();
        match storage_class.as_str() {
            "BLOB" => {
                let bytes: Vec<u8> = row.try_get_unchecked(index)?;
                Ok(Some(format!("[BLOB: {} bytes]", bytes.len())))
            }
            _ => {
                // TEXT is not guaranteed to be valid UTF-8
                let bytes: Vec<u8> = row.try_get_unchecked(index)?;
                Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
            }
        }
    }

    /// Whether the table's primary key can be a rowid alias at all
    ///
    /// `WITHOUT ROWID` tables have no rowid, and a primary key that SQLite
    /// backs with its own index (e.g. `INTEGER PRIMARY KEY DESC`) is an
    /// ordinary column rather than an alias.
    async fn has_rowid_primary_key(&self, table: &str) -> Result<bool, DatabaseError> {
        let sql: Option<String> = sqlx::query_scalar::<_, Option<String>>(
            "SELECT sql FROM sqlite_master WHERE type='table' AND name = ?",
        )
        .bind(table)
        .fetch_optional(&self.pool)
        .await?
        .flatten();
        if sql.as_deref().is_some_and(Self::is_without_rowid) {
            return Ok(false);
        }

        let index_list_query = format!("PRAGMA index_list({})", query::quote_identifier(table));
        let indexes = sqlx::query(&index_list_query).fetch_all(&self.pool).await?;
        for index in indexes {
            let origin: String = index.try_get("origin")?;
            if origin == "pk" {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn is_without_rowid(create_sql: &str) -> bool {
        let normalized = create_sql.to_ascii_uppercase().replace([')', ',', ';'], " ");
        let words: Vec<&str> = normalized.split_whitespace().collect();
        words.windows(2).any(|pair| pair == ["WITHOUT", "ROWID"])
    }

    /// Whether a column is SQLite's rowid alias, i.e. assigned on insert
    fn is_rowid_alias(
        data_type: &str,
        primary_key_position: i64,
        primary_key_count: usize,
        rowid_primary_key: bool,
    ) -> bool {
        rowid_primary_key
            && primary_key_position > 0
            && primary_key_count == 1
            && data_type.eq_ignore_ascii_case("INTEGER")
    }
}

#[async_trait]
impl DatabaseProvider for SqliteProvider {
    async fn list_tables(&self) -> Result<Vec<String>, DatabaseError> {
        let query = "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'";

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let mut tables = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row.try_get("name")?;
            tables.push(name);
        }

        Ok(tables)
    }

    async fn list_columns(&self, table: &str) -> Result<Vec<ColumnInfo>, DatabaseError> {
        self.ensure_table(table).await?;

        let table_info_query = format!("PRAGMA table_info({})", query::quote_identifier(table));
        let column_rows = sqlx::query(&table_info_query)
            .fetch_all(&self.pool)
            .await?;

        // PRAGMA table_info returns: cid, name, type, notnull, dflt_value, pk
        let mut described = Vec::with_capacity(column_rows.len());
        for row in column_rows {
            let name: String = row.try_get("name")?;
            let data_type: String = row.try_get("type")?;
            let primary_key: i64 = row.try_get("pk")?;
            described.push((name, data_type, primary_key));
        }

        let primary_key_count = described.iter().filter(|(_, _, pk)| *pk > 0).count();
        let rowid_primary_key = primary_key_count == 1 && self.has_rowid_primary_key(table).await?;

        Ok(described
            .into_iter()
            .map(|(name, data_type, primary_key)| ColumnInfo {
                auto_assigned: Self::is_rowid_alias(
                    &data_type,
                    primary_key,
                    primary_key_count,
                    rowid_primary_key,
                ),
                is_primary_key: primary_key > 0,
                name,
                data_type,
            })
            .collect())
    }

    async fn fetch_rows(&self, table: &str, query: &RowQuery) -> Result<RowSet, DatabaseError> {
        let columns = self.list_columns(table).await?;
        let built = query::build_select(table, &columns, query);
        let rows = self.fetch_all(&built).await?;
        Ok(RowSet { columns, rows })
    }

    async fn fetch_row(
        &self,
        table: &str,
        id: i64,
    ) -> Result<(Vec<ColumnInfo>, Option<Row>), DatabaseError> {
        let columns = self.list_columns(table).await?;
        let built = query::build_fetch_by_id(table, &columns, id)?;
        let row = self.fetch_all(&built).await?.into_iter().next();
        Ok((columns, row))
    }

    async fn insert_row(&self, table: &str, form: &RowForm) -> Result<u64, DatabaseError> {
        let columns = self.list_columns(table).await?;
        let built = query::build_insert(table, &columns, form)?;
        self.execute(&built).await
    }

    async fn update_row(&self, table: &str, id: i64, form: &RowForm) -> Result<u64, DatabaseError> {
        let columns = self.list_columns(table).await?;
        let built = query::build_update(table, &columns, form, id)?;
        self.execute(&built).await
    }

    async fn delete_row(&self, table: &str, id: i64) -> Result<u64, DatabaseError> {
        let columns = self.list_columns(table).await?;
        let built = query::build_delete(table, &columns, id)?;
        self.execute(&built).await
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
