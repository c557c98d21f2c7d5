// SPDX-License-Identifier: MIT

//! Role-specific dashboard pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, routing::get, Extension, Router};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::models::SessionUser;
use crate::render::{recent_member_rows, MemberRow};
use crate::time_utils::format_long_date;
use crate::AppState;

pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new().route("/dashboard/admin", get(admin_dashboard))
}

pub fn member_routes() -> Router<Arc<AppState>> {
    Router::new().route("/dashboard/member", get(member_dashboard))
}

pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new().route("/dashboard/user", get(user_dashboard))
}

#[derive(Template, WebTemplate)]
#[template(path = "admin_dashboard.html")]
struct AdminDashboardTemplate {
    display_name: String,
    photo_url: String,
    total_members: usize,
    rows: Vec<MemberRow>,
}

#[derive(Template, WebTemplate)]
#[template(path = "member_dashboard.html")]
struct MemberDashboardTemplate {
    display_name: String,
    photo_url: String,
    email: String,
    plan_label: String,
    valid_until: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "user_dashboard.html")]
struct UserDashboardTemplate {
    display_name: String,
    photo_url: String,
    email: String,
}

async fn admin_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> AdminDashboardTemplate {
    // A failed fetch degrades to an empty dashboard; the page still loads.
    let members = match state.db.query_members().await {
        Ok(members) => members,
        Err(e) => {
            tracing::error!(error = %e, "Error loading members for admin dashboard");
            Vec::new()
        }
    };

    AdminDashboardTemplate {
        display_name: user.display_name,
        photo_url: user.photo_url,
        total_members: members.len(),
        rows: recent_member_rows(&members),
    }
}

async fn member_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> MemberDashboardTemplate {
    // A missing profile and a failed fetch render the same fallbacks.
    let profile = match state.db.get_profile(&user.id).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!(id = %user.id, error = %e, "Error loading profile for member dashboard");
            None
        }
    };

    let plan = profile
        .as_ref()
        .and_then(|p| p.membership_plan.clone())
        .unwrap_or_else(|| "Basic".to_string());

    let valid_until = profile
        .as_ref()
        .and_then(|p| p.end_date.as_deref())
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .map(format_long_date)
        .unwrap_or_else(|| "N/A".to_string());

    MemberDashboardTemplate {
        display_name: user.display_name,
        photo_url: user.photo_url,
        email: user.email,
        plan_label: format!("{} Member", plan),
        valid_until,
    }
}

async fn user_dashboard(Extension(user): Extension<SessionUser>) -> UserDashboardTemplate {
    UserDashboardTemplate {
        display_name: user.display_name,
        photo_url: user.photo_url,
        email: user.email,
    }
}
