// SPDX-License-Identifier: MIT

//! Profile document model (authoritative copy, stored in Firestore).

use serde::{Deserialize, Serialize};

/// Authorization role recorded on the profile document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Member,
    Admin,
}

/// Membership tier of the account holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    User,
    Member,
}

/// User profile stored in Firestore.
///
/// Created on first sign-in (with defaults) or by an admin creating a
/// member; mutated by admin edits and self-service plan selection; never
/// hard-deleted except by an explicit admin delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDocument {
    /// Principal ID from the identity provider (also the document ID)
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Phone number (optional for self-registered users)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Authorization role; `admin` grants the admin dashboard
    #[serde(default)]
    pub role: Role,
    /// Membership tier
    #[serde(default)]
    pub user_type: UserType,
    /// Chosen membership plan name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_plan: Option<String>,
    /// Membership start date (ISO 8601 date)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Membership end date, computed from start date + duration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Membership duration in months
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_months: Option<u32>,
    /// Creation timestamp (RFC3339, written server-side)
    pub created_at: String,
    /// Principal ID of the admin that created this profile, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Date of birth (admin-created members)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Assigned trainer name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Profile picture URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl ProfileDocument {
    /// Build the default profile written for a principal that signs in
    /// without an existing document.
    pub fn default_for(id: &str, email: &str, display_name: Option<&str>, now: String) -> Self {
        Self {
            id: id.to_string(),
            name: display_name.unwrap_or("User").to_string(),
            email: email.to_string(),
            phone: None,
            role: Role::User,
            user_type: UserType::User,
            membership_plan: None,
            start_date: None,
            end_date: None,
            duration_months: None,
            created_at: now,
            created_by: None,
            dob: None,
            gender: None,
            address: None,
            trainer: None,
            notes: None,
            photo_url: None,
        }
    }
}
