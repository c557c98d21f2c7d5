// SPDX-License-Identifier: MIT

//! Session projection of a signed-in user.

use crate::models::profile::{ProfileDocument, Role, UserType};
use serde::{Deserialize, Serialize};

/// Placeholder avatar shown when the profile has no photo.
pub const DEFAULT_AVATAR: &str = "https://via.placeholder.com/100";

/// Derived, non-authoritative projection of the signed-in principal.
///
/// Carried in the signed session cookie and consulted by the guards and
/// page headers. The authoritative copy is the profile document; on each
/// auth-state transition the projection is rebuilt from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub photo_url: String,
    pub is_admin: bool,
    pub user_type: UserType,
}

impl SessionUser {
    /// Merge auth-provider fields with the profile document.
    ///
    /// The profile name wins over the auth display name, and `is_admin`
    /// is true iff the profile role is `admin`.
    pub fn from_profile(
        id: &str,
        email: &str,
        auth_display_name: Option<&str>,
        photo_url: Option<&str>,
        profile: &ProfileDocument,
    ) -> Self {
        let fallback_name = auth_display_name.unwrap_or("User");
        Self {
            id: id.to_string(),
            email: email.to_string(),
            display_name: if profile.name.is_empty() {
                fallback_name.to_string()
            } else {
                profile.name.clone()
            },
            photo_url: photo_url.unwrap_or(DEFAULT_AVATAR).to_string(),
            is_admin: profile.role == Role::Admin,
            user_type: profile.user_type,
        }
    }

    /// Best-effort projection when the profile fetch failed or the profile
    /// does not exist yet. Never privileged.
    pub fn degraded(
        id: &str,
        email: &str,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Self {
        Self {
            id: id.to_string(),
            email: email.to_string(),
            display_name: display_name.unwrap_or("User").to_string(),
            photo_url: photo_url.unwrap_or(DEFAULT_AVATAR).to_string(),
            is_admin: false,
            user_type: UserType::User,
        }
    }

    /// Dashboard path for this user; a pure function of `(is_admin, user_type)`.
    pub fn dashboard_path(&self) -> &'static str {
        if self.is_admin {
            "/dashboard/admin"
        } else if self.user_type == UserType::Member {
            "/dashboard/member"
        } else {
            "/dashboard/user"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(role: Role, user_type: UserType) -> ProfileDocument {
        let mut p =
            ProfileDocument::default_for("uid1", "a@b.com", Some("Jo"), "2024-01-01T00:00:00Z".into());
        p.role = role;
        p.user_type = user_type;
        p
    }

    #[test]
    fn test_is_admin_iff_role_admin() {
        let admin = SessionUser::from_profile("u", "a@b.com", None, None, &profile(Role::Admin, UserType::User));
        assert!(admin.is_admin);

        let member = SessionUser::from_profile("u", "a@b.com", None, None, &profile(Role::Member, UserType::Member));
        assert!(!member.is_admin);
    }

    #[test]
    fn test_dashboard_path_by_role() {
        let admin = SessionUser::from_profile("u", "a@b.com", None, None, &profile(Role::Admin, UserType::User));
        assert_eq!(admin.dashboard_path(), "/dashboard/admin");

        let member = SessionUser::from_profile("u", "a@b.com", None, None, &profile(Role::Member, UserType::Member));
        assert_eq!(member.dashboard_path(), "/dashboard/member");

        let user = SessionUser::from_profile("u", "a@b.com", None, None, &profile(Role::User, UserType::User));
        assert_eq!(user.dashboard_path(), "/dashboard/user");
    }

    #[test]
    fn test_degraded_session_is_never_privileged() {
        let u = SessionUser::degraded("u", "a@b.com", Some("Jo"), None);
        assert!(!u.is_admin);
        assert_eq!(u.user_type, UserType::User);
        assert_eq!(u.photo_url, DEFAULT_AVATAR);
    }

    #[test]
    fn test_profile_name_wins_over_auth_name() {
        let p = profile(Role::User, UserType::User);
        let u = SessionUser::from_profile("u", "a@b.com", Some("Auth Name"), None, &p);
        assert_eq!(u.display_name, "Jo");
    }
}
