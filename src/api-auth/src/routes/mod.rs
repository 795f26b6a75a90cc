use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod logging_middleware;
pub mod pages;

//
// Router
//

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::get_index))
        .route("/register", get(pages::get_register).post(pages::post_register))
        .route("/login", get(pages::get_login).post(pages::post_login))
        .route("/dashboard", get(pages::get_dashboard))
        .route("/users", get(pages::get_users))
        // Custom route access logging
        .layer(middleware::from_fn(logging_middleware::log_route_access))
        // Tracing middleware
        .layer(TraceLayer::new_for_http())
}
