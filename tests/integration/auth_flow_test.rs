//! End-to-end session flow tests
//!
//! Drives the composed router directly: login, who-am-I, role
//! enforcement, refresh, and logout.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{body_json, set_cookies, TestApp, MANAGER_PASSWORD, ROOT_PASSWORD, STAFF_PASSWORD};

#[tokio::test]
async fn test_login_returns_tokens_and_sets_cookies() {
    let app = TestApp::new().await.unwrap();
    let before_ms = chrono::Utc::now().timestamp_millis();

    let response = app
        .post_json(
            "/api/auth/login",
            json!({ "username": "staff1", "password": STAFF_PASSWORD }),
            &[],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 2);
    let access_cookie = cookies
        .iter()
        .find(|c| c.starts_with("accessToken="))
        .expect("access cookie set");
    assert!(access_cookie.contains("HttpOnly"));
    assert!(access_cookie.contains("SameSite=Strict"));
    assert!(access_cookie.contains("Max-Age=900"));
    let refresh_cookie = cookies
        .iter()
        .find(|c| c.starts_with("refreshToken="))
        .expect("refresh cookie set");
    assert!(refresh_cookie.contains("Max-Age=604800"));

    let body = body_json(response).await;
    assert_eq!(body["user"]["username"], "staff1");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("passwordHash").is_none());

    // Access token expiry is ~now + 900_000 ms.
    let expiry = body["accessTokenExpiry"].as_i64().unwrap();
    assert!(expiry >= before_ms + 895_000, "expiry too early: {expiry}");
    assert!(expiry <= before_ms + 905_000, "expiry too late: {expiry}");

    let refresh_expiry = body["refreshTokenExpiry"].as_i64().unwrap();
    assert!(refresh_expiry >= before_ms + 604_790_000);
}

#[tokio::test]
async fn test_login_missing_fields_is_bad_request() {
    let app = TestApp::new().await.unwrap();

    let response = app
        .post_json("/api/auth/login", json!({ "username": "staff1" }), &[])
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post_json(
            "/api/auth/login",
            json!({ "username": "", "password": "" }),
            &[],
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_bad_credentials_reports_remaining_attempts() {
    let app = TestApp::new().await.unwrap();

    let response = app
        .post_json(
            "/api/auth/login",
            json!({ "username": "staff1", "password": "wrong" }),
            &[("x-forwarded-for", "198.51.100.1")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["remainingAttempts"], 4);
    // Unknown username reads identically to a wrong password.
    let response = app
        .post_json(
            "/api/auth/login",
            json!({ "username": "ghost", "password": "wrong" }),
            &[("x-forwarded-for", "198.51.100.1")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let ghost_body = body_json(response).await;
    assert_eq!(ghost_body["error"]["message"], body["error"]["message"]);
}

#[tokio::test]
async fn test_me_roundtrip_with_cookie_and_bearer() {
    let app = TestApp::new().await.unwrap();
    let (access, _, _) = app.login("staff1", STAFF_PASSWORD).await;

    // Bearer header
    let response = app
        .get(
            "/api/auth/me",
            &[("authorization", &format!("Bearer {access}"))],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["role"], "user");
    assert!(body["accessTokenExpiry"].as_i64().unwrap() > chrono::Utc::now().timestamp_millis());

    // Cookie fallback
    let response = app
        .get(
            "/api/auth/me",
            &[("cookie", &format!("accessToken={access}"))],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // No token at all
    let response = app.get("/api/auth/me", &[]).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_role_allow_list_enforcement() {
    let app = TestApp::new().await.unwrap();

    // Unauthenticated: 401.
    let response = app.get("/api/users", &[]).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Authenticated as `user`: 403, not 401.
    let (staff_access, _, _) = app.login("staff1", STAFF_PASSWORD).await;
    let response = app
        .get(
            "/api/users",
            &[("authorization", &format!("Bearer {staff_access}"))],
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Authenticated as `admin`: 200 with all three profiles.
    let (manager_access, _, _) = app.login("manager", MANAGER_PASSWORD).await;
    let response = app
        .get(
            "/api/users",
            &[("authorization", &format!("Bearer {manager_access}"))],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["users"].as_array().unwrap().len(), 3);

    // The seeded super_admin account is admitted too.
    let (root_access, _, root_body) = app.login("root", ROOT_PASSWORD).await;
    assert_eq!(root_body["user"]["role"], "super_admin");
    let response = app
        .get(
            "/api/users",
            &[("authorization", &format!("Bearer {root_access}"))],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_user_requires_super_admin() {
    let app = TestApp::new().await.unwrap();
    let new_user = json!({
        "username": "staff2",
        "staffName": "Staff Two",
        "password": "staff2-pass-123",
        "role": "user",
    });

    // Unauthenticated: 401.
    let response = app.post_json("/api/users", new_user.clone(), &[]).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Admin is not enough: 403.
    let (manager_access, _, _) = app.login("manager", MANAGER_PASSWORD).await;
    let response = app
        .post_json(
            "/api/users",
            new_user.clone(),
            &[("authorization", &format!("Bearer {manager_access}"))],
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // super_admin creates the account.
    let (root_access, _, _) = app.login("root", ROOT_PASSWORD).await;
    let root_auth = format!("Bearer {root_access}");
    let response = app
        .post_json(
            "/api/users",
            new_user.clone(),
            &[("authorization", &root_auth)],
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["username"], "staff2");
    assert_eq!(body["role"], "user");
    assert!(body.get("passwordHash").is_none());

    // The new account can sign in.
    let (_, _, login_body) = app.login("staff2", "staff2-pass-123").await;
    assert_eq!(login_body["user"]["staffName"], "Staff Two");

    // Duplicate username: 400.
    let response = app
        .post_json("/api/users", new_user, &[("authorization", &root_auth)])
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_refresh_flow() {
    let app = TestApp::new().await.unwrap();
    let (access, refresh, _) = app.login("staff1", STAFF_PASSWORD).await;

    // Refresh with the refresh cookie mints a new access token.
    let response = app
        .post_json(
            "/api/auth/refresh",
            json!({}),
            &[("cookie", &format!("refreshToken={refresh}"))],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    assert!(cookies.iter().any(|c| c.starts_with("accessToken=")));
    let body = body_json(response).await;
    assert_eq!(body["user"]["username"], "staff1");
    assert!(body["accessToken"].as_str().is_some());

    // No cookie: 401.
    let response = app.post_json("/api/auth/refresh", json!({}), &[]).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // An access token in the refresh cookie never verifies (distinct
    // signing domains).
    let response = app
        .post_json(
            "/api/auth/refresh",
            json!({}),
            &[("cookie", &format!("refreshToken={access}"))],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A refresh token presented as an access token is rejected too.
    let response = app
        .get(
            "/api/auth/me",
            &[("authorization", &format!("Bearer {refresh}"))],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_cookies_but_tokens_survive_until_expiry() {
    let app = TestApp::new().await.unwrap();
    let (access, _, _) = app.login("staff1", STAFF_PASSWORD).await;

    let response = app.post_json("/api/auth/logout", json!({}), &[]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 2);
    for cookie in &cookies {
        assert!(cookie.contains("Max-Age=0"), "cookie not cleared: {cookie}");
    }
    assert!(cookies.iter().any(|c| c.starts_with("accessToken=;")));
    assert!(cookies.iter().any(|c| c.starts_with("refreshToken=;")));

    // Verification is stateless: a replayed pre-logout token still works
    // until its natural expiry. Known limitation, not a defect — there is
    // no server-side revocation list.
    let response = app
        .get(
            "/api/auth/me",
            &[("authorization", &format!("Bearer {access}"))],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}
