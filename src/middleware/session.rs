// SPDX-License-Identifier: MIT

//! Session cookie guard middleware.
//!
//! The signed-in user's projection travels in a signed JWT under the
//! well-known session cookie. Guards decode it once per request, redirect
//! on missing/invalid sessions or role mismatches, and otherwise insert
//! the [`SessionUser`] as a request extension. No network calls.

use crate::models::{SessionUser, UserType};
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Well-known session cookie name; exactly one session is cached under it.
pub const SESSION_COOKIE: &str = "gymhub_session";

/// JWT claims carrying the session projection.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (principal ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    #[serde(flatten)]
    pub user: SessionUser,
}

/// Role a guarded page requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredRole {
    None,
    Admin,
    Member,
}

/// Where the guard sends a request it does not let through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    RedirectLogin,
    RedirectHome,
}

/// Gate decision as a pure function of the cached session and required role.
pub fn guard_decision(user: Option<&SessionUser>, required: RequiredRole) -> GuardOutcome {
    let Some(user) = user else {
        return GuardOutcome::RedirectLogin;
    };
    match required {
        RequiredRole::None => GuardOutcome::Allow,
        RequiredRole::Admin if user.is_admin => GuardOutcome::Allow,
        RequiredRole::Member if user.user_type == UserType::Member => GuardOutcome::Allow,
        _ => GuardOutcome::RedirectHome,
    }
}

/// Decode the session cookie into a projection, if present and valid.
pub fn session_from_jar(jar: &CookieJar, signing_key: &[u8]) -> Option<SessionUser> {
    let token = jar.get(SESSION_COOKIE)?.value().to_string();

    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(&token, &key, &validation)
        .ok()
        .map(|data| data.claims.user)
}

async fn guard(
    state: Arc<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
    required: RequiredRole,
) -> Response {
    let user = session_from_jar(&jar, &state.config.session_signing_key);

    match guard_decision(user.as_ref(), required) {
        GuardOutcome::RedirectLogin => Redirect::temporary("/login").into_response(),
        GuardOutcome::RedirectHome => Redirect::temporary("/").into_response(),
        GuardOutcome::Allow => {
            // Checked above: Allow implies a decoded session.
            if let Some(user) = user {
                request.extensions_mut().insert(user);
            }
            next.run(request).await
        }
    }
}

/// Middleware requiring any signed-in session.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    guard(state, jar, request, next, RequiredRole::None).await
}

/// Middleware requiring an admin session.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    guard(state, jar, request, next, RequiredRole::Admin).await
}

/// Middleware requiring a member session.
pub async fn require_member(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    guard(state, jar, request, next, RequiredRole::Member).await
}

/// Create a session JWT for a resolved user.
pub fn create_session_jwt(user: &SessionUser, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user.id.clone(),
        iat: now,
        exp: now + 30 * 24 * 60 * 60, // 30 days
        user: user.clone(),
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
