// SPDX-License-Identifier: MIT

use gymhub::config::Config;
use gymhub::db::FirestoreDb;
use gymhub::middleware::session::{create_session_jwt, SESSION_COOKIE};
use gymhub::models::{SessionUser, UserType};
use gymhub::routes::create_router;
use gymhub::services::IdentityService;
use gymhub::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::default();
    let db = test_db_offline();
    let identity = IdentityService::new_mock();

    let state = Arc::new(AppState {
        config,
        db,
        identity,
    });

    (create_router(state.clone()), state)
}

/// A session user with the given privileges.
#[allow(dead_code)]
pub fn session_user(is_admin: bool, user_type: UserType) -> SessionUser {
    SessionUser {
        id: "test-uid".to_string(),
        email: "test@example.com".to_string(),
        display_name: "Test User".to_string(),
        photo_url: "https://via.placeholder.com/100".to_string(),
        is_admin,
        user_type,
    }
}

/// Mint a session cookie header value for the given user.
#[allow(dead_code)]
pub fn session_cookie_header(user: &SessionUser, signing_key: &[u8]) -> String {
    let token = create_session_jwt(user, signing_key).expect("JWT creation failed");
    format!("{}={}", SESSION_COOKIE, token)
}
