// SPDX-License-Identifier: MIT

//! Dashboard sections that exist in the navigation but have no backend
//! yet, plus self-service plan selection.
//!
//! The stub endpoints answer 501 so the pages render an honest "coming
//! soon" state instead of an empty table.

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::session::create_session_jwt;
use crate::models::SessionUser;
use crate::services::members::select_plan;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/payments", get(payments))
        .route("/api/classes", get(classes))
        .route("/api/bookings", get(bookings))
        .route("/api/trainers", get(trainers))
        .route("/api/plans", get(plans))
        .route("/api/plans/select", post(choose_plan))
}

async fn payments() -> AppError {
    AppError::NotImplemented("Payment history")
}

async fn classes() -> AppError {
    AppError::NotImplemented("Class schedule")
}

async fn bookings() -> AppError {
    AppError::NotImplemented("Class bookings")
}

async fn trainers() -> AppError {
    AppError::NotImplemented("Trainer directory")
}

async fn plans() -> AppError {
    AppError::NotImplemented("Plan catalog")
}

#[derive(Debug, Deserialize)]
pub struct SelectPlanPayload {
    pub plan: String,
}

#[derive(Debug, Serialize)]
pub struct SelectPlanResponse {
    pub redirect: String,
}

/// Upgrade the signed-in user to a membership on the chosen plan. The
/// session cookie is reissued so the new role takes effect immediately.
async fn choose_plan(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    jar: CookieJar,
    Json(payload): Json<SelectPlanPayload>,
) -> Result<(CookieJar, Json<SelectPlanResponse>)> {
    let updated = select_plan(&state.db, &user, &payload.plan).await?;

    let token = create_session_jwt(&updated, &state.config.session_signing_key)?;
    let jar = jar.add(super::auth::session_cookie(token));

    Ok((
        jar,
        Json(SelectPlanResponse {
            redirect: updated.dashboard_path().to_string(),
        }),
    ))
}
