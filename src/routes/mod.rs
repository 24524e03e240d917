// src/routes/mod.rs
pub mod chat;
pub mod health;
pub mod static_files;

use std::time::Duration;

use crate::state::SharedState;
use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use chat::chat_handler;
use health::health_check;
use static_files::static_handler;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn create_router() -> Router<SharedState> {
    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/health", get(health_check))
        .fallback(static_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// Fixed CORS policy; preflight requests are answered by the layer itself.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(86400))
}
