// SPDX-License-Identifier: MIT

//! Authentication routes: password sign-up/sign-in, Google federated
//! sign-in, and logout.
//!
//! A successful sign-in resolves the principal against its profile
//! document, then issues the session cookie and tells the client which
//! dashboard to land on.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::session::{create_session_jwt, SESSION_COOKIE};
use crate::models::{ProfileDocument, Role, SessionUser, UserType};
use crate::services::members::rollback_principal;
use crate::services::observer::resolve_signed_in;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/google", get(google_start))
        .route("/auth/google/callback", get(google_callback))
        .route("/auth/logout", get(logout))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterPayload {
    #[validate(length(min = 1, message = "This field is required"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(custom(function = "crate::ui::validate::phone_validator"))]
    pub phone: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub confirm_password: String,
    /// "user" (default) or "member"
    #[serde(default)]
    pub user_type: Option<UserType>,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

/// Body returned after a successful sign-in or registration.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub redirect: String,
}

pub(crate) fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn issue_session(
    jar: CookieJar,
    user: &SessionUser,
    signing_key: &[u8],
) -> Result<(CookieJar, String)> {
    let token = create_session_jwt(user, signing_key)?;
    Ok((jar.add(session_cookie(token)), user.dashboard_path().to_string()))
}

/// Create an account with email and password.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<RegisterPayload>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if payload.password != payload.confirm_password {
        return Err(AppError::BadRequest("Passwords do not match".to_string()));
    }

    let principal = state
        .identity
        .sign_up(&payload.email, &payload.password)
        .await?;

    if let Err(e) = state
        .identity
        .set_display_name(&principal.id_token, &payload.name)
        .await
    {
        rollback_principal(&state.identity, &principal.id_token, &principal.id).await;
        return Err(e);
    }

    let profile = registered_profile(
        &principal.id,
        &principal.email,
        &payload,
        format_utc_rfc3339(chrono::Utc::now()),
    );

    if let Err(e) = state.db.upsert_profile(&profile).await {
        rollback_principal(&state.identity, &principal.id_token, &principal.id).await;
        return Err(e);
    }

    let user = SessionUser::from_profile(
        &principal.id,
        &principal.email,
        principal.display_name.as_deref().or(Some(payload.name.as_str())),
        principal.photo_url.as_deref(),
        &profile,
    );

    tracing::info!(id = %user.id, "Account registered");

    let (jar, redirect) = issue_session(jar, &user, &state.config.session_signing_key)?;
    Ok((jar, Json(AuthResponse { redirect })))
}

/// Profile document written for a self-registered account. The chosen
/// user type mirrors into the role.
fn registered_profile(
    principal_id: &str,
    email: &str,
    payload: &RegisterPayload,
    now: String,
) -> ProfileDocument {
    let mut profile = ProfileDocument::default_for(principal_id, email, Some(&payload.name), now);
    profile.phone = Some(payload.phone.clone());
    if payload.user_type == Some(UserType::Member) {
        profile.role = Role::Member;
        profile.user_type = UserType::Member;
    }
    profile
}

/// Sign in with email and password.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    let principal = state
        .identity
        .sign_in_with_password(&payload.email, &payload.password)
        .await?;

    let user = resolve_signed_in(&state.db, &principal).await;
    tracing::info!(id = %user.id, is_admin = user.is_admin, "Signed in");

    let (jar, redirect) = issue_session(jar, &user, &state.config.session_signing_key)?;
    Ok((jar, Json(AuthResponse { redirect })))
}

/// Clear the session cookie.
async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (jar.remove(removal), Redirect::temporary("/login"))
}

/// Start the Google federated sign-in flow.
async fn google_start(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
) -> Result<Redirect> {
    if state.config.google_client_id.is_empty() {
        return Err(AppError::BadRequest(
            "Federated sign-in is not configured".to_string(),
        ));
    }

    let frontend_url = state.config.frontend_url.clone();

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis();

    // Payload: "frontend_url|timestamp_hex", then signed.
    let state_payload = format!("{}|{:x}", frontend_url, timestamp);

    let mut mac = HmacSha256::new_from_slice(&state.config.oauth_state_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(state_payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    let signed_state = format!("{}|{}", state_payload, hex::encode(signature));
    let oauth_state = URL_SAFE_NO_PAD.encode(signed_state.as_bytes());

    let callback_url = callback_url(&headers);

    let auth_url = format!(
        "https://accounts.google.com/o/oauth2/v2/auth?\
         client_id={}&\
         redirect_uri={}&\
         response_type=code&\
         scope=openid%20email%20profile&\
         state={}",
        state.config.google_client_id,
        urlencoding::encode(&callback_url),
        oauth_state
    );

    tracing::info!(frontend_url = %frontend_url, "Starting federated sign-in, redirecting to Google");

    Ok(Redirect::temporary(&auth_url))
}

fn callback_url(headers: &axum::http::HeaderMap) -> String {
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| {
            std::env::var("API_HOST").unwrap_or_else(|_| "localhost:8080".to_string())
        });

    let scheme = if host.contains("localhost") || host.contains("127.0.0.1") {
        "http"
    } else {
        "https"
    };

    format!("{}://{}/auth/google/callback", scheme, host)
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    state: String,
    #[serde(default)]
    error: Option<String>,
}

/// Federated sign-in callback: exchange code for an ID token, sign in with
/// the identity provider, resolve the profile, issue the session.
async fn google_callback(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect)> {
    if verify_and_decode_state(&params.state, &state.config.oauth_state_key).is_none() {
        tracing::warn!("Invalid or tampered state parameter on federated callback");
        return Err(AppError::BadRequest("Invalid state parameter".to_string()));
    }

    if let Some(error) = params.error {
        tracing::warn!(error = %error, "Federated sign-in error from Google");
        let redirect = format!("/login?error={}", urlencoding::encode(&error));
        return Ok((jar, Redirect::temporary(&redirect)));
    }

    let code = params
        .code
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".to_string()))?;

    let id_token = state
        .identity
        .exchange_google_code(
            &state.config.google_client_id,
            &state.config.google_client_secret,
            &code,
            &callback_url(&headers),
        )
        .await?;

    let principal = state.identity.sign_in_with_idp(&id_token).await?;
    let user = resolve_signed_in(&state.db, &principal).await;

    tracing::info!(id = %user.id, "Federated sign-in successful");

    let (jar, redirect) = issue_session(jar, &user, &state.config.session_signing_key)?;
    Ok((jar, Redirect::temporary(&redirect)))
}

/// Verify the HMAC signature on the OAuth state parameter and recover the
/// frontend URL it was issued for.
fn verify_and_decode_state(state: &str, secret: &[u8]) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // Format is "frontend_url|timestamp_hex|signature_hex"
    let parts: Vec<&str> = state_str.splitn(3, '|').collect();
    if parts.len() != 3 {
        return None;
    }

    let frontend_url = parts[0];
    let timestamp_hex = parts[1];
    let signature_hex = parts[2];

    let payload = format!("{}|{}", frontend_url, timestamp_hex);

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());

    let expected_signature = hex::encode(mac.finalize().into_bytes());

    if signature_hex != expected_signature {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    Some(frontend_url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_and_decode_state_success() {
        let secret = b"secret_key";
        let frontend_url = "https://example.com";
        let timestamp = 1234567890u128;

        let payload = format!("{}|{:x}", frontend_url, timestamp);
        let mut mac = HmacSha256::new_from_slice(secret).unwrap();
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        let state_data = format!("{}|{}", payload, signature);
        let encoded_state = URL_SAFE_NO_PAD.encode(state_data.as_bytes());

        let result = verify_and_decode_state(&encoded_state, secret);
        assert_eq!(result, Some(frontend_url.to_string()));
    }

    #[test]
    fn test_verify_and_decode_state_invalid_signature() {
        let secret = b"secret_key";
        let state_data = "https://example.com|499602d2|deadbeef";
        let encoded_state = URL_SAFE_NO_PAD.encode(state_data.as_bytes());

        assert_eq!(verify_and_decode_state(&encoded_state, secret), None);
    }

    #[test]
    fn test_verify_and_decode_state_wrong_secret() {
        let secret = b"secret_key";
        let frontend_url = "https://example.com";
        let timestamp = 1234567890u128;

        let payload = format!("{}|{:x}", frontend_url, timestamp);
        let mut mac = HmacSha256::new_from_slice(secret).unwrap();
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        let state_data = format!("{}|{}", payload, signature);
        let encoded_state = URL_SAFE_NO_PAD.encode(state_data.as_bytes());

        assert_eq!(verify_and_decode_state(&encoded_state, b"wrong_key"), None);
    }

    #[test]
    fn test_verify_and_decode_state_malformed() {
        let secret = b"secret_key";
        let encoded_state = URL_SAFE_NO_PAD.encode("invalid|format");
        assert_eq!(verify_and_decode_state(&encoded_state, secret), None);
    }

    fn register_payload(user_type: Option<UserType>) -> RegisterPayload {
        RegisterPayload {
            name: "Jo".into(),
            email: "jo@example.com".into(),
            phone: "555-123-4567".into(),
            password: "secret99".into(),
            confirm_password: "secret99".into(),
            user_type,
        }
    }

    #[test]
    fn test_registered_profile_carries_phone() {
        let payload = register_payload(None);
        let profile = registered_profile("uid1", "jo@example.com", &payload, "2024-01-01T00:00:00Z".into());

        assert_eq!(profile.phone.as_deref(), Some("555-123-4567"));
        assert_eq!(profile.name, "Jo");
        assert_eq!(profile.role, Role::User);
        assert_eq!(profile.user_type, UserType::User);
    }

    #[test]
    fn test_registered_member_mirrors_role() {
        let payload = register_payload(Some(UserType::Member));
        let profile = registered_profile("uid1", "jo@example.com", &payload, "2024-01-01T00:00:00Z".into());

        assert_eq!(profile.role, Role::Member);
        assert_eq!(profile.user_type, UserType::Member);
    }

    #[test]
    fn test_register_validation_rejects_bad_phone() {
        let mut payload = register_payload(None);
        payload.phone = "12345".into();

        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("phone"));
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok".to_string());
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }
}
