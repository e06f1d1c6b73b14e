use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use axum_table_editor::{
    DatabaseProvider, RowQuery, SortDirection, SqliteProvider, TableEditorLayer, ViewMode,
};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tower::ServiceExt;

/// Single-connection in-memory database, so every handle sees the same data
async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database")
}

async fn gift_pool() -> SqlitePool {
    let pool = memory_pool().await;
    sqlx::query(
        "CREATE TABLE gifts (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, recipient TEXT)",
    )
    .execute(&pool)
    .await
    .unwrap();
    for (name, recipient) in [("Scarf", "Mom"), ("Book", "Dad")] {
        sqlx::query("INSERT INTO gifts (name, recipient) VALUES (?, ?)")
            .bind(name)
            .bind(recipient)
            .execute(&pool)
            .await
            .unwrap();
    }
    pool
}

fn router(pool: &SqlitePool) -> Router {
    TableEditorLayer::sqlite("", pool.clone()).into_router()
}

async fn read_body(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, read_body(response).await)
}

async fn post_form(app: Router, uri: &str, body: &str) -> (StatusCode, Option<String>) {
    let response = app
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|value| value.to_str().unwrap().to_string());
    (response.status(), location)
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("{needle} not rendered"))
}

#[tokio::test]
async fn test_listing_defaults_to_first_table() {
    let pool = gift_pool().await;
    let (status, body) = get(router(&pool), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<a class=\"nav-link active\" href=\"/?table=gifts\">gifts</a>"));
    assert!(body.contains("<td>Scarf</td>"));
    assert!(body.contains("<td>Book</td>"));
}

#[tokio::test]
async fn test_listing_without_tables() {
    let pool = memory_pool().await;
    let (status, body) = get(router(&pool), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("contains no tables"));
}

#[tokio::test]
async fn test_search_returns_matching_rows_only() {
    let pool = gift_pool().await;
    let (status, body) = get(router(&pool), "/?table=gifts&search=Mom").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<td>Scarf</td>"));
    assert!(!body.contains("<td>Book</td>"));

    // LIKE is case-insensitive for ASCII
    let (_, body) = get(router(&pool), "/?table=gifts&search=mom").await;
    assert!(body.contains("<td>Scarf</td>"));
}

#[tokio::test]
async fn test_sort_direction_orders_rows() {
    let pool = gift_pool().await;

    let (_, body) = get(router(&pool), "/?table=gifts&sort=name&direction=desc").await;
    assert!(position(&body, "<td>Scarf</td>") < position(&body, "<td>Book</td>"));
    assert!(body.contains('↓'));

    let (_, body) = get(router(&pool), "/?table=gifts&sort=name&direction=asc").await;
    assert!(position(&body, "<td>Book</td>") < position(&body, "<td>Scarf</td>"));
    assert!(body.contains('↑'));
}

#[tokio::test]
async fn test_unknown_sort_column_is_ignored() {
    let pool = gift_pool().await;
    let provider = SqliteProvider::new(pool);

    let unsorted = provider.fetch_rows("gifts", &RowQuery::default()).await.unwrap();
    for sort in ["missing", "NAME", "name; DROP TABLE gifts"] {
        let query = RowQuery {
            sort: Some(sort.to_string()),
            direction: SortDirection::Descending,
            ..RowQuery::default()
        };
        let sorted = provider.fetch_rows("gifts", &query).await.unwrap();
        assert_eq!(sorted.rows, unsorted.rows);
    }
    assert_eq!(provider.list_tables().await.unwrap(), vec!["gifts".to_string()]);
}

#[tokio::test]
async fn test_sorted_values_are_monotonic() {
    let pool = memory_pool().await;
    sqlx::query("CREATE TABLE prices (id INTEGER PRIMARY KEY, amount REAL)")
        .execute(&pool)
        .await
        .unwrap();
    for amount in [3.5, 1.0, 12.25, 7.0, 1.0] {
        sqlx::query("INSERT INTO prices (amount) VALUES (?)")
            .bind(amount)
            .execute(&pool)
            .await
            .unwrap();
    }
    let provider = SqliteProvider::new(pool);

    for (direction, ascending) in [(SortDirection::Ascending, true), (SortDirection::Descending, false)] {
        let query = RowQuery {
            sort: Some("amount".to_string()),
            direction,
            ..RowQuery::default()
        };
        let rows = provider.fetch_rows("prices", &query).await.unwrap();
        let amounts: Vec<f64> = rows
            .rows
            .iter()
            .map(|row| row.text(1).parse().unwrap())
            .collect();
        assert_eq!(amounts.len(), 5);
        for pair in amounts.windows(2) {
            if ascending {
                assert!(pair[0] <= pair[1]);
            } else {
                assert!(pair[0] >= pair[1]);
            }
        }
    }
}

#[tokio::test]
async fn test_search_matches_some_column() {
    let pool = gift_pool().await;
    let provider = SqliteProvider::new(pool);
    let query = RowQuery {
        search: Some("A".to_string()),
        ..RowQuery::default()
    };
    let rows = provider.fetch_rows("gifts", &query).await.unwrap();
    assert!(!rows.rows.is_empty());
    for row in &rows.rows {
        assert!(row
            .values
            .iter()
            .flatten()
            .any(|value| value.to_lowercase().contains('a')));
    }
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let pool = gift_pool().await;
    let provider = SqliteProvider::new(pool.clone());
    for search in ["_", "%", "S_arf"] {
        let query = RowQuery {
            search: Some(search.to_string()),
            ..RowQuery::default()
        };
        let rows = provider.fetch_rows("gifts", &query).await.unwrap();
        assert!(rows.rows.is_empty(), "{search} matched {:?}", rows.rows);
    }

    sqlx::query("INSERT INTO gifts (name, recipient) VALUES ('50% off_card', 'Aunt')")
        .execute(&pool)
        .await
        .unwrap();
    let query = RowQuery {
        search: Some("% off_".to_string()),
        ..RowQuery::default()
    };
    let rows = provider.fetch_rows("gifts", &query).await.unwrap();
    assert_eq!(rows.rows.len(), 1);
    assert_eq!(rows.rows[0].text(1), "50% off_card");
}

#[tokio::test]
async fn test_columns_are_stable_and_ordered() {
    let pool = gift_pool().await;
    let provider = SqliteProvider::new(pool);

    let first = provider.list_columns("gifts").await.unwrap();
    let second = provider.list_columns("gifts").await.unwrap();
    assert_eq!(first, second);

    let names: Vec<&str> = first.iter().map(|column| column.name.as_str()).collect();
    assert_eq!(names, vec!["id", "name", "recipient"]);
    assert!(first[0].is_primary_key);
    assert!(first[0].auto_assigned);
    assert!(!first[1].auto_assigned);
}

#[tokio::test]
async fn test_insert_then_read() {
    let pool = gift_pool().await;

    let (status, location) = post_form(router(&pool), "/add_row/gifts", "name=Lamp").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/?table=gifts"));

    let provider = SqliteProvider::new(pool);
    let (_, row) = provider.fetch_row("gifts", 3).await.unwrap();
    let row = row.expect("inserted row");
    assert_eq!(
        row.values,
        vec![Some("3".to_string()), Some("Lamp".to_string()), Some(String::new())]
    );
}

#[tokio::test]
async fn test_insert_requires_identifier_the_database_does_not_assign() {
    let pool = memory_pool().await;
    sqlx::query("CREATE TABLE codes (code TEXT PRIMARY KEY, label TEXT)")
        .execute(&pool)
        .await
        .unwrap();

    let (status, _) = post_form(router(&pool), "/add_row/codes", "label=Missing").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_form(router(&pool), "/add_row/codes", "code=A1&label=Present").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_primary_key_without_rowid_is_not_auto_assigned() {
    let pool = memory_pool().await;
    sqlx::query("CREATE TABLE tags (id INTEGER PRIMARY KEY, name TEXT) WITHOUT ROWID")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("CREATE TABLE ranks (id INTEGER PRIMARY KEY DESC, name TEXT)")
        .execute(&pool)
        .await
        .unwrap();

    let provider = SqliteProvider::new(pool.clone());
    for table in ["tags", "ranks"] {
        let columns = provider.list_columns(table).await.unwrap();
        assert!(columns[0].is_primary_key);
        assert!(!columns[0].auto_assigned, "{table} id reported as auto-assigned");

        let (status, body) = get(router(&pool), &format!("/add_row/{table}")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("Auto-generated"));

        let (status, _) = post_form(router(&pool), &format!("/add_row/{table}"), "name=x").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) =
            post_form(router(&pool), &format!("/add_row/{table}"), "id=4&name=x").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
    }
}

#[tokio::test]
async fn test_invalid_utf8_text_is_rendered_lossily() {
    let pool = gift_pool().await;
    sqlx::query("INSERT INTO gifts (name, recipient) VALUES (CAST(X'FF41' AS TEXT), 'Mom')")
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) = get(router(&pool), "/?table=gifts").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<td>\u{FFFD}A</td>"));
}

#[tokio::test]
async fn test_type_mismatch_is_a_server_error() {
    let pool = memory_pool().await;
    sqlx::query("CREATE TABLE counts (id INTEGER PRIMARY KEY, amount INTEGER) STRICT")
        .execute(&pool)
        .await
        .unwrap();

    let response = router(&pool)
        .oneshot(
            Request::post("/add_row/counts")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("amount=not-a-number"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_body(response).await;
    assert!(body.contains("500 Internal Server Error"));
}

#[tokio::test]
async fn test_update_then_read() {
    let pool = gift_pool().await;

    let (status, location) =
        post_form(router(&pool), "/update_row/gifts/1", "id=1&name=Shawl&recipient=Aunt").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/?table=gifts"));

    // A form without the identifier leaves it untouched
    let (status, _) = post_form(router(&pool), "/update_row/gifts/2", "name=Novel").await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let provider = SqliteProvider::new(pool);
    let (_, row) = provider.fetch_row("gifts", 1).await.unwrap();
    assert_eq!(
        row.unwrap().values,
        vec![Some("1".to_string()), Some("Shawl".to_string()), Some("Aunt".to_string())]
    );
    let (_, row) = provider.fetch_row("gifts", 2).await.unwrap();
    assert_eq!(
        row.unwrap().values,
        vec![Some("2".to_string()), Some("Novel".to_string()), Some(String::new())]
    );
}

#[tokio::test]
async fn test_delete_then_read() {
    let pool = gift_pool().await;

    let (status, location) = post_form(router(&pool), "/delete_row/gifts/2", "").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/?table=gifts"));

    let provider = SqliteProvider::new(pool.clone());
    let (_, row) = provider.fetch_row("gifts", 2).await.unwrap();
    assert!(row.is_none());

    let (status, body) = get(router(&pool), "/edit_row/gifts/2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Row not found"));
}

#[tokio::test]
async fn test_edit_form_is_prefilled() {
    let pool = gift_pool().await;
    let (status, body) = get(router(&pool), "/edit_row/gifts/1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("action=\"/update_row/gifts/1\""));
    assert!(body.contains(r#"name="name" value="Scarf""#));
    assert!(body.contains(r#"name="recipient" value="Mom""#));
}

#[tokio::test]
async fn test_add_form_lists_every_column() {
    let pool = gift_pool().await;
    let (status, body) = get(router(&pool), "/add_row/gifts").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"placeholder="Auto-generated" disabled"#));
    assert_eq!(body.matches("type=\"text\"").count(), 3);
}

#[tokio::test]
async fn test_malformed_row_id_is_not_found() {
    let pool = gift_pool().await;
    let (status, _) = get(router(&pool), "/edit_row/gifts/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post_form(router(&pool), "/delete_row/gifts/1.5", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_table_is_rejected_before_any_sql() {
    let pool = gift_pool().await;

    let (status, body) = get(router(&pool), "/?table=missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Table not found: missing"));
    assert!(body.contains("<!DOCTYPE html>"));

    let (status, _) = post_form(
        router(&pool),
        "/delete_row/gifts%20WHERE%201%3D1%3B%20--/1",
        "",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let provider = SqliteProvider::new(pool);
    let rows = provider.fetch_rows("gifts", &RowQuery::default()).await.unwrap();
    assert_eq!(rows.rows.len(), 2);
}

#[tokio::test]
async fn test_compact_view_limits_columns() {
    let pool = memory_pool().await;
    sqlx::query(
        "CREATE TABLE wide (id INTEGER PRIMARY KEY, a TEXT, b TEXT, c TEXT, d TEXT, e TEXT)",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO wide (a, b, c, d, e) VALUES ('va', 'vb', 'vc', 'vd', 've')")
        .execute(&pool)
        .await
        .unwrap();

    let (_, compact) = get(router(&pool), "/?table=wide&view=compact").await;
    assert!(compact.contains("<td>vb</td>"));
    assert!(!compact.contains("<td>vc</td>"));
    assert!(!compact.contains("<th>c</th>"));

    let (_, grid) = get(router(&pool), "/?table=wide&view=grid").await;
    assert!(grid.contains("<td>ve</td>"));

    let (_, list) = get(router(&pool), "/?table=wide&view=list").await;
    assert!(list.contains("<strong>e:</strong> ve"));

    let provider = SqliteProvider::new(pool);
    let query = RowQuery {
        view: ViewMode::Compact,
        ..RowQuery::default()
    };
    // the query itself still fetches every column
    let rows = provider.fetch_rows("wide", &query).await.unwrap();
    assert_eq!(rows.rows[0].values.len(), 6);
}

#[tokio::test]
async fn test_nested_base_path() {
    let pool = gift_pool().await;
    let app = || TableEditorLayer::sqlite("/admin", pool.clone()).into_router();

    let (status, body) = get(app(), "/admin?table=gifts").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("href=\"/admin/edit_row/gifts/1\""));
    assert!(body.contains("href=\"/admin/static/app.css\""));

    let (status, location) = post_form(app(), "/admin/delete_row/gifts/1", "").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/admin?table=gifts"));
}

#[tokio::test]
async fn test_static_assets_and_health() {
    let pool = gift_pool().await;

    let response = router(&pool)
        .oneshot(Request::get("/static/app.js").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/javascript"
    );
    assert!(read_body(response).await.contains("debounceSearch"));

    let (status, _) = get(router(&pool), "/static/missing.css").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(router(&pool), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}
