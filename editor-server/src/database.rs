use sqlx::sqlite::SqlitePool;

/// Create and populate a small `gifts` table unless it already exists
pub async fn seed_demo(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS gifts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            recipient TEXT,
            price REAL,
            purchased BOOLEAN DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    let gift_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM gifts")
        .fetch_one(pool)
        .await?;

    if gift_count.0 > 0 {
        // Data already seeded
        return Ok(());
    }

    let gifts = [
        ("Scarf", "Mom", 24.99, true),
        ("Book", "Dad", 15.50, false),
        ("Headphones", "Sam", 89.00, false),
        ("Board Game", "Alex", 39.95, true),
        ("Candle Set", "Grandma", 18.25, false),
    ];

    for (name, recipient, price, purchased) in gifts {
        sqlx::query("INSERT INTO gifts (name, recipient, price, purchased) VALUES (?, ?, ?, ?)")
            .bind(name)
            .bind(recipient)
            .bind(price)
            .bind(purchased)
            .execute(pool)
            .await?;
    }

    tracing::info!(rows = gifts.len(), "demo table 'gifts' seeded");
    Ok(())
}
