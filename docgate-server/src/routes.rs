//! Router assembly.
//!
//! Two dynamic routes cover every declared resource; the resolver decides
//! per request whether the `{resource}` segment maps to a schema. Anything
//! outside `/api` falls through to the static client bundle with an
//! `index.html` fallback for client-side routing.

use std::path::Path;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

fn api_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/resources/{resource}",
            get(handlers::list)
                .post(handlers::create)
                .put(handlers::update_many)
                .delete(handlers::delete_many),
        )
        .route(
            "/resources/{resource}/{id}",
            get(handlers::read_by_id)
                .put(handlers::update_by_id)
                .delete(handlers::delete_by_id),
        )
        .with_state(state)
}

pub fn build_router(state: AppState, client_dir: &str) -> Router {
    let client = ServeDir::new(client_dir)
        .fallback(ServeFile::new(Path::new(client_dir).join("index.html")));

    Router::new()
        .nest("/api", api_routes(state))
        .fallback_service(client)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
