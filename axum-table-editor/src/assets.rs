//! Embedded static asset serving
//!
//! The stylesheet and script used by the rendered pages are compiled into the
//! binary and served with MIME types guessed from their file names.

use axum::{
    body::Body,
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use include_dir::{include_dir, Dir};

// Embed the assets directory at compile time
static ASSETS: Dir = include_dir!("$CARGO_MANIFEST_DIR/assets");

/// Handler for GET /static/{*path}
///
/// Caching: max-age=3600 (1 hour), assets are not content-hashed
pub async fn serve_static_asset(Path(path): Path<String>) -> Response {
    match asset_response(&path) {
        Some(response) => response,
        None => {
            tracing::debug!(path = %path, "static asset not found");
            (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                format!("Asset not found: {}", path),
            )
                .into_response()
        }
    }
}

fn asset_response(path: &str) -> Option<Response> {
    let file = ASSETS.get_file(path)?;
    let mime_type = mime_guess::from_path(path).first_or_octet_stream().to_string();

    Some(
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, mime_type),
                (header::CACHE_CONTROL, "public, max-age=3600".to_string()),
            ],
            Body::from(file.contents()),
        )
            .into_response(),
    )
}
