use axum_table_editor::TableEditorLayer;
use clap::Parser;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::path::PathBuf;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

mod database;

/// Browse and edit the tables of a SQLite database in the browser
#[derive(Parser, Debug)]
#[command(name = "editor-server")]
#[command(version)]
struct Args {
    /// Path to the SQLite database file
    #[arg(short, long, env = "TABLE_EDITOR_DATABASE", default_value = "db/personal_data.db")]
    database: PathBuf,

    /// Address to listen on
    #[arg(short, long, env = "TABLE_EDITOR_BIND", default_value = "127.0.0.1:5000")]
    bind: String,

    /// URL path to mount the editor at, e.g. "/tables"
    #[arg(long, env = "TABLE_EDITOR_BASE_PATH", default_value = "")]
    base_path: String,

    /// Create the database file if it does not exist
    #[arg(long)]
    create: bool,

    /// Create and populate a demo `gifts` table if it is missing
    #[arg(long)]
    seed_demo: bool,
}

#[derive(Debug, Error)]
enum ServerError {
    #[error("failed to open database {path}: {source}")]
    Database {
        path: PathBuf,
        source: sqlx::Error,
    },

    #[error("failed to seed demo data: {0}")]
    Seed(#[source] sqlx::Error),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if let Err(error) = run(args).await {
        tracing::error!(%error, "editor-server stopped");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), ServerError> {
    let options = SqliteConnectOptions::new()
        .filename(&args.database)
        .create_if_missing(args.create);
    let pool = SqlitePool::connect_with(options)
        .await
        .map_err(|source| ServerError::Database {
            path: args.database.clone(),
            source,
        })?;

    if args.seed_demo {
        database::seed_demo(&pool).await.map_err(ServerError::Seed)?;
    }

    let app = TableEditorLayer::sqlite(args.base_path.as_str(), pool).into_router();

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .map_err(|source| ServerError::Bind {
            address: args.bind.clone(),
            source,
        })?;

    tracing::info!(
        database = %args.database.display(),
        "table editor running at http://{}{}/",
        args.bind,
        args.base_path
    );

    axum::serve(listener, app).await.map_err(ServerError::Serve)
}
