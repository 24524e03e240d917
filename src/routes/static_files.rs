use axum::{
    http::{Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};

use crate::services::assets;

/// Serves the embedded chat UI for every path no other route claims.
pub async fn static_handler(method: Method, uri: Uri) -> Response {
    let Some(asset) = assets::lookup(uri.path()) else {
        tracing::debug!(path = uri.path(), "no such asset");
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };

    if method != Method::GET && method != Method::HEAD {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET, HEAD")],
            "Method not allowed",
        )
            .into_response();
    }

    (
        [
            (header::CONTENT_TYPE, asset.content_type),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        asset.body,
    )
        .into_response()
}
