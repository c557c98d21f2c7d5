// SPDX-License-Identifier: MIT

//! Auth-state resolution.
//!
//! On every sign-in transition the signed-in principal is resolved against
//! its profile document and projected into a [`SessionUser`]:
//! - profile found: merge auth and profile fields;
//! - profile missing: write a default profile (role=user, user_type=user);
//! - profile fetch failed: log and fall back to a degraded, non-privileged
//!   projection rather than blocking the sign-in.
//!
//! Single attempt, no retries; errors are logged and swallowed.

use crate::db::FirestoreDb;
use crate::models::{ProfileDocument, SessionUser};
use crate::services::identity::Principal;
use crate::time_utils::format_utc_rfc3339;

/// Resolve a signed-in principal to its session projection.
pub async fn resolve_signed_in(db: &FirestoreDb, principal: &Principal) -> SessionUser {
    match db.get_profile(&principal.id).await {
        Ok(Some(profile)) => SessionUser::from_profile(
            &principal.id,
            &principal.email,
            principal.display_name.as_deref(),
            principal.photo_url.as_deref(),
            &profile,
        ),
        Ok(None) => {
            let profile = ProfileDocument::default_for(
                &principal.id,
                &principal.email,
                principal.display_name.as_deref(),
                format_utc_rfc3339(chrono::Utc::now()),
            );
            if let Err(e) = db.upsert_profile(&profile).await {
                tracing::error!(id = %principal.id, error = %e, "Error creating profile document");
                return SessionUser::degraded(
                    &principal.id,
                    &principal.email,
                    principal.display_name.as_deref(),
                    principal.photo_url.as_deref(),
                );
            }
            tracing::info!(id = %principal.id, "Created default profile document");
            SessionUser::from_profile(
                &principal.id,
                &principal.email,
                principal.display_name.as_deref(),
                principal.photo_url.as_deref(),
                &profile,
            )
        }
        Err(e) => {
            tracing::error!(id = %principal.id, error = %e, "Error getting profile document");
            SessionUser::degraded(
                &principal.id,
                &principal.email,
                principal.display_name.as_deref(),
                principal.photo_url.as_deref(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal() -> Principal {
        Principal {
            id: "uid1".into(),
            email: "jo@example.com".into(),
            display_name: Some("Jo".into()),
            photo_url: None,
            id_token: "token".into(),
        }
    }

    #[tokio::test]
    async fn test_fetch_error_degrades_without_blocking() {
        // Offline mock: every db call errors, mirroring a fetch failure.
        let db = FirestoreDb::new_mock();
        let user = resolve_signed_in(&db, &principal()).await;

        assert!(!user.is_admin);
        assert_eq!(user.id, "uid1");
        assert_eq!(user.display_name, "Jo");
    }
}
