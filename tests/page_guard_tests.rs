// SPDX-License-Identifier: MIT

//! Page guard tests.
//!
//! These tests verify that:
//! 1. Dashboard pages redirect to /login without a session cookie
//! 2. Role mismatches redirect to the home page
//! 3. A valid session reaches the page behind the guard

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use gymhub::models::UserType;
use tower::ServiceExt;

mod common;

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

#[tokio::test]
async fn test_dashboards_redirect_to_login_without_session() {
    for path in ["/dashboard/admin", "/dashboard/member", "/dashboard/user"] {
        let (app, _state) = common::create_test_app();

        let response = app
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::TEMPORARY_REDIRECT,
            "{path} should redirect without a session"
        );
        assert_eq!(location(&response), "/login");
    }
}

#[tokio::test]
async fn test_garbage_cookie_redirects_to_login() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/dashboard/user")
                .header(header::COOKIE, "gymhub_session=not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_plain_user_is_sent_home_from_admin_page() {
    let (app, state) = common::create_test_app();

    let user = common::session_user(false, UserType::User);
    let cookie = common::session_cookie_header(&user, &state.config.session_signing_key);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/dashboard/admin")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_member_is_sent_home_from_admin_page() {
    let (app, state) = common::create_test_app();

    let member = common::session_user(false, UserType::Member);
    let cookie = common::session_cookie_header(&member, &state.config.session_signing_key);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/dashboard/admin")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_signed_in_user_reaches_their_dashboard() {
    let (app, state) = common::create_test_app();

    let user = common::session_user(false, UserType::User);
    let cookie = common::session_cookie_header(&user, &state.config.session_signing_key);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/dashboard/user")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // No database access on this page, so the mock backend renders fine.
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_dashboard_loads_despite_fetch_error() {
    let (app, state) = common::create_test_app();

    let admin = common::session_user(true, UserType::User);
    let cookie = common::session_cookie_header(&admin, &state.config.session_signing_key);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/dashboard/admin")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // The offline mock fails every query; the page degrades to an empty
    // dashboard instead of failing the load.
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("No members found"));
}

#[tokio::test]
async fn test_member_dashboard_loads_despite_fetch_error() {
    let (app, state) = common::create_test_app();

    let member = common::session_user(false, UserType::Member);
    let cookie = common::session_cookie_header(&member, &state.config.session_signing_key);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/dashboard/member")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // The failed profile fetch renders the same fallbacks as a missing one.
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Basic Member"));
    assert!(html.contains("N/A"));
}

#[tokio::test]
async fn test_public_pages_need_no_session() {
    for path in ["/", "/login", "/register", "/health"] {
        let (app, _state) = common::create_test_app();

        let response = app
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "{path} should be public");
    }
}

#[tokio::test]
async fn test_logout_clears_the_session_cookie() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/login");

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("logout should set a removal cookie");
    assert!(set_cookie.starts_with("gymhub_session="));
    assert!(set_cookie.contains("Max-Age=0"));
}
