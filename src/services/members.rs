// SPDX-License-Identifier: MIT

//! Member mutation flows: admin create/delete and self-service plan
//! selection.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{ProfileDocument, Role, SessionUser, UserType};
use crate::services::identity::IdentityService;
use crate::time_utils::{add_months, format_utc_rfc3339};
use chrono::NaiveDate;
use ring::rand::{SecureRandom, SystemRandom};
use serde::Deserialize;
use validator::Validate;

/// One-time password length for admin-created members.
const PASSWORD_LEN: usize = 8;
const PASSWORD_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Admin create-member payload.
#[derive(Debug, Deserialize, Validate)]
pub struct NewMember {
    #[validate(length(min = 1, message = "This field is required"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(custom(function = "crate::ui::validate::phone_validator"))]
    pub phone: String,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[validate(length(min = 1, message = "This field is required"))]
    pub membership_plan: String,
    #[serde(default)]
    pub trainer: Option<String>,
    /// ISO 8601 date (YYYY-MM-DD)
    pub start_date: String,
    #[validate(range(min = 1, max = 60, message = "Duration must be 1-60 months"))]
    pub duration_months: u32,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub send_credentials: bool,
}

/// Generate a random 8-character alphanumeric one-time password.
pub fn generate_password() -> Result<String, AppError> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; PASSWORD_LEN];
    rng.fill(&mut bytes)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Random generator failure")))?;

    Ok(bytes
        .iter()
        .map(|b| PASSWORD_CHARSET[*b as usize % PASSWORD_CHARSET.len()] as char)
        .collect())
}

/// Compute the membership end date from a start date and duration.
pub fn membership_end_date(start_date: &str, duration_months: u32) -> Result<String, AppError> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("Invalid start date (expected YYYY-MM-DD)".to_string()))?;
    Ok(add_months(start, duration_months).format("%Y-%m-%d").to_string())
}

/// Create a member: principal in the identity provider, display name, then
/// the profile document.
///
/// Any step failure aborts and surfaces the provider error verbatim. If a
/// step after principal creation fails, the principal is deleted again so
/// the saga leaves no orphan behind.
pub async fn create_member(
    db: &FirestoreDb,
    identity: &IdentityService,
    admin: &SessionUser,
    form: &NewMember,
) -> Result<String, AppError> {
    let end_date = membership_end_date(&form.start_date, form.duration_months)?;

    let password = generate_password()?;
    let principal = identity.sign_up(&form.email, &password).await?;

    if let Err(e) = identity.set_display_name(&principal.id_token, &form.name).await {
        rollback_principal(identity, &principal.id_token, &principal.id).await;
        return Err(e);
    }

    let profile = ProfileDocument {
        id: principal.id.clone(),
        name: form.name.clone(),
        email: form.email.clone(),
        phone: Some(form.phone.clone()),
        role: Role::Member,
        user_type: UserType::Member,
        membership_plan: Some(form.membership_plan.clone()),
        start_date: Some(form.start_date.clone()),
        end_date: Some(end_date),
        duration_months: Some(form.duration_months),
        created_at: format_utc_rfc3339(chrono::Utc::now()),
        created_by: Some(admin.id.clone()),
        dob: form.dob.clone(),
        gender: form.gender.clone(),
        address: form.address.clone(),
        trainer: form.trainer.clone(),
        notes: form.notes.clone(),
        photo_url: None,
    };

    if let Err(e) = db.upsert_profile(&profile).await {
        rollback_principal(identity, &principal.id_token, &principal.id).await;
        return Err(e);
    }

    if form.send_credentials {
        // Credential e-mail delivery is handled out of band; record intent.
        tracing::info!(member_id = %principal.id, email = %form.email, "Credentials requested for new member");
    }

    tracing::info!(member_id = %principal.id, created_by = %admin.id, "Member added");
    Ok(principal.id)
}

/// Delete the principal created earlier in a sign-up saga. Shared by the
/// admin create-member flow and self-service registration.
pub(crate) async fn rollback_principal(identity: &IdentityService, id_token: &str, id: &str) {
    if let Err(e) = identity.delete_account(id_token).await {
        // The orphan the rollback was meant to prevent now exists.
        tracing::error!(principal_id = %id, error = %e, "Compensating principal delete failed");
    } else {
        tracing::info!(principal_id = %id, "Rolled back principal after failed account creation");
    }
}

/// Delete a member's profile document.
///
/// Requires explicit confirmation. The identity-provider principal is
/// intentionally left in place; the orphan is logged so operators can
/// see the gap.
pub async fn delete_member(db: &FirestoreDb, id: &str, confirm: bool) -> Result<(), AppError> {
    if !confirm {
        return Err(AppError::BadRequest(
            "Deletion requires confirmation (confirm=true)".to_string(),
        ));
    }

    db.delete_profile(id).await?;
    tracing::info!(member_id = %id, "Member deleted");
    tracing::warn!(member_id = %id, "Identity-provider principal left in place after member delete");
    Ok(())
}

/// Self-service plan selection.
///
/// A signed-in member gets a no-op with a message; anyone else is upgraded
/// to a one-month membership on the chosen plan via fetch-modify-write.
/// Returns the updated projection so the caller can reissue the session.
pub async fn select_plan(
    db: &FirestoreDb,
    user: &SessionUser,
    plan_name: &str,
) -> Result<SessionUser, AppError> {
    if user.user_type == UserType::Member {
        return Err(AppError::BadRequest("You are already a member.".to_string()));
    }

    let mut profile = db
        .get_profile(&user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", user.id)))?;

    let start_date = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let end_date = membership_end_date(&start_date, 1)?;

    profile.user_type = UserType::Member;
    profile.role = Role::Member;
    profile.membership_plan = Some(plan_name.to_string());
    profile.start_date = Some(start_date);
    profile.duration_months = Some(1);
    profile.end_date = Some(end_date);

    db.upsert_profile(&profile).await?;
    tracing::info!(id = %user.id, plan = %plan_name, "Plan selected");

    let mut updated = user.clone();
    updated.user_type = UserType::Member;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_password_shape() {
        let pw = generate_password().unwrap();
        assert_eq!(pw.len(), 8);
        assert!(pw.bytes().all(|b| PASSWORD_CHARSET.contains(&b)));

        // Vanishingly unlikely to collide if actually random.
        assert_ne!(generate_password().unwrap(), generate_password().unwrap());
    }

    #[test]
    fn test_membership_end_date() {
        assert_eq!(membership_end_date("2024-01-15", 3).unwrap(), "2024-04-15");
        assert_eq!(membership_end_date("2024-12-01", 12).unwrap(), "2025-12-01");
    }

    #[test]
    fn test_membership_end_date_rejects_garbage() {
        let err = membership_end_date("15/01/2024", 3).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_unconfirmed_delete_is_rejected() {
        let db = FirestoreDb::new_mock();
        let err = delete_member(&db, "m1", false).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_existing_member_plan_selection_is_a_noop() {
        let db = FirestoreDb::new_mock();
        let member = SessionUser {
            id: "uid1".into(),
            email: "a@b.com".into(),
            display_name: "Jo".into(),
            photo_url: String::new(),
            is_admin: false,
            user_type: UserType::Member,
        };

        // Rejected before any db access; the offline mock would error.
        let err = select_plan(&db, &member, "Premium").await.unwrap_err();
        match err {
            AppError::BadRequest(msg) => assert_eq!(msg, "You are already a member."),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_profile_write_rolls_back_principal() {
        use crate::services::identity::StagedIdentity;

        // Provider succeeds, profile write fails (offline db).
        let db = FirestoreDb::new_mock();
        let (identity, staged) = IdentityService::new_staged();
        let admin = SessionUser {
            id: "admin1".into(),
            email: "admin@example.com".into(),
            display_name: "Admin".into(),
            photo_url: String::new(),
            is_admin: true,
            user_type: UserType::User,
        };
        let form = NewMember {
            name: "Jo".into(),
            email: "jo@example.com".into(),
            phone: "555-123-4567".into(),
            dob: None,
            gender: None,
            address: None,
            membership_plan: "Premium".into(),
            trainer: None,
            start_date: "2024-01-15".into(),
            duration_months: 3,
            notes: None,
            send_credentials: false,
        };

        let err = create_member(&db, &identity, &admin, &form).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));

        // The created principal was deleted again.
        assert_eq!(staged.deleted_tokens(), vec![StagedIdentity::ID_TOKEN.to_string()]);
    }

    #[test]
    fn test_new_member_validation() {
        let form = NewMember {
            name: "Jo".into(),
            email: "not-an-email".into(),
            phone: "555-123-4567".into(),
            dob: None,
            gender: None,
            address: None,
            membership_plan: "Basic".into(),
            trainer: None,
            start_date: "2024-01-15".into(),
            duration_months: 3,
            notes: None,
            send_credentials: false,
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }
}
