// SPDX-License-Identifier: MIT

//! Admin member-management API: table fragments, create, delete.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::SessionUser;
use crate::render::{member_rows, recent_member_rows, MembersTableTemplate, RecentMembersTemplate};
use crate::services::members::{create_member, delete_member, NewMember};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/members", get(list_members).post(add_member))
        .route("/api/members/recent", get(recent_members))
        .route("/api/members/count", get(member_count))
        .route("/api/members/{id}", delete(remove_member))
}

/// Full members table as an HTML fragment. The page swaps the whole table
/// body for this on every refresh.
async fn list_members(State(state): State<Arc<AppState>>) -> Result<MembersTableTemplate> {
    let members = state.db.query_members().await?;
    Ok(MembersTableTemplate {
        rows: member_rows(&members),
    })
}

/// Most recent members (capped) as an HTML fragment.
async fn recent_members(State(state): State<Arc<AppState>>) -> Result<RecentMembersTemplate> {
    let members = state.db.query_members().await?;
    Ok(RecentMembersTemplate {
        rows: recent_member_rows(&members),
    })
}

#[derive(Serialize)]
struct MemberCount {
    total: usize,
}

async fn member_count(State(state): State<Arc<AppState>>) -> Result<Json<MemberCount>> {
    let total = state.db.count_members().await?;
    Ok(Json(MemberCount { total }))
}

#[derive(Serialize)]
struct CreatedMember {
    id: String,
}

async fn add_member(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<SessionUser>,
    Json(payload): Json<NewMember>,
) -> Result<(StatusCode, Json<CreatedMember>)> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let id = create_member(&state.db, &state.identity, &admin, &payload).await?;
    Ok((StatusCode::CREATED, Json(CreatedMember { id })))
}

#[derive(Deserialize)]
struct DeleteParams {
    #[serde(default)]
    confirm: bool,
}

async fn remove_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Result<StatusCode> {
    delete_member(&state.db, &id, params.confirm).await?;
    Ok(StatusCode::NO_CONTENT)
}
