// SPDX-License-Identifier: MIT

//! Collection-to-markup rendering pipeline.
//!
//! Documents come back from a single filtered query, get mapped through a
//! row view model with literal fallbacks for missing fields, and are bound
//! to an askama fragment that replaces the whole container. A render is
//! always a full replacement, so repeated renders never stack rows or
//! duplicate row-action bindings.

use crate::models::ProfileDocument;
use crate::time_utils::format_short_date;
use askama::Template;
use askama_web::WebTemplate;
use chrono::{DateTime, Utc};
use std::hash::{DefaultHasher, Hash, Hasher};

/// How many rows the "recent members" view shows.
pub const RECENT_LIMIT: usize = 4;

/// Row view model for the member tables.
///
/// Always carries a display name and plan label; absent source fields fall
/// back to literal defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub plan: String,
    pub join_date: String,
    pub avatar_url: String,
}

impl From<&ProfileDocument> for MemberRow {
    fn from(doc: &ProfileDocument) -> Self {
        let name = if doc.name.is_empty() {
            "Unknown".to_string()
        } else {
            doc.name.clone()
        };
        let join_date = parse_created_at(&doc.created_at)
            .map(|dt| format_short_date(dt.date_naive()))
            .unwrap_or_else(|| "N/A".to_string());

        Self {
            id: doc.id.clone(),
            name,
            email: or_na(&doc.email),
            phone: doc.phone.as_deref().map(or_na).unwrap_or_else(|| "N/A".to_string()),
            plan: doc
                .membership_plan
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| "Basic".to_string()),
            join_date,
            avatar_url: doc
                .photo_url
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| placeholder_avatar(&doc.id)),
        }
    }
}

fn or_na(value: &str) -> String {
    if value.is_empty() {
        "N/A".to_string()
    } else {
        value.to_string()
    }
}

fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Placeholder avatar between the two fixed portrait sets.
///
/// Derived from the document id so a member keeps the same placeholder
/// across renders.
pub fn placeholder_avatar(id: &str) -> String {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let h = hasher.finish();

    let category = if h % 2 == 0 { "men" } else { "women" };
    format!(
        "https://randomuser.me/api/portraits/{}/{}.jpg",
        category,
        (h / 2) % 100
    )
}

/// Map queried member documents to rows, preserving query order.
pub fn member_rows(docs: &[ProfileDocument]) -> Vec<MemberRow> {
    docs.iter().map(MemberRow::from).collect()
}

/// Map member documents to the "recent" view: newest first by creation
/// timestamp, capped at [`RECENT_LIMIT`]. Documents with an unparseable
/// timestamp sort last.
pub fn recent_member_rows(docs: &[ProfileDocument]) -> Vec<MemberRow> {
    let mut docs: Vec<&ProfileDocument> = docs.iter().collect();
    docs.sort_by_key(|d| {
        std::cmp::Reverse(parse_created_at(&d.created_at).unwrap_or(DateTime::<Utc>::MIN_UTC))
    });
    docs.into_iter().take(RECENT_LIMIT).map(MemberRow::from).collect()
}

/// Full members table body (8 columns).
#[derive(Template, WebTemplate)]
#[template(path = "members_table.html")]
pub struct MembersTableTemplate {
    pub rows: Vec<MemberRow>,
}

/// Recent-members table body for the admin dashboard (4 columns).
#[derive(Template, WebTemplate)]
#[template(path = "recent_members.html")]
pub struct RecentMembersTemplate {
    pub rows: Vec<MemberRow>,
}
