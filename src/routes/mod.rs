// SPDX-License-Identifier: MIT

//! HTTP route handlers.

pub mod auth;
pub mod dashboard;
pub mod members;
pub mod stubs;

use crate::middleware::session::{require_admin, require_auth, require_member};
use crate::AppState;
use axum::http::{header, Method};
use axum::response::Html;
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

// Entry pages. The real markup ships with the static site; these stand in
// as the guard redirect targets.
async fn home() -> Html<&'static str> {
    Html("<!DOCTYPE html><html><body><h1>GymHub</h1></body></html>")
}

async fn login_page() -> Html<&'static str> {
    Html("<!DOCTYPE html><html><body><form id=\"login-form\"></form></body></html>")
}

async fn register_page() -> Html<&'static str> {
    Html("<!DOCTYPE html><html><body><form id=\"register-form\"></form></body></html>")
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from frontend URL and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/", get(home))
        .route("/login", get(login_page))
        .route("/register", get(register_page))
        .merge(auth::routes());

    // Admin-only pages and member management
    let admin_routes = Router::new()
        .merge(dashboard::admin_routes())
        .merge(members::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Member-only pages
    let member_routes = dashboard::member_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), require_member));

    // Any signed-in session
    let user_routes = Router::new()
        .merge(dashboard::user_routes())
        .merge(stubs::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .merge(member_routes)
        .merge(user_routes)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
