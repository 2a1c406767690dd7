//! Shared test harness: a composed router over an in-memory store

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use pricewatch_accounts::{hash_password, CredentialRecord, CredentialStore, MemoryCredentialStore};
use pricewatch_app::create_app;
use pricewatch_auth::Role;
use pricewatch_common::Config;

pub const STAFF_PASSWORD: &str = "staff-pass-123";
pub const MANAGER_PASSWORD: &str = "manager-pass-123";
pub const ROOT_PASSWORD: &str = "root-pass-123";

pub struct TestApp {
    router: Router,
}

impl TestApp {
    /// App with three accounts: `root` (super_admin, seeded by the
    /// composition root), `manager` (admin), and `staff1` (user).
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config {
            access_token_secret: "integration-access-secret".to_string(),
            refresh_token_secret: "integration-refresh-secret".to_string(),
            cookie_secure: false,
            seed_admin_username: "root".to_string(),
            seed_admin_password: ROOT_PASSWORD.to_string(),
            log_level: "info".to_string(),
            port: 0,
        };

        let store = MemoryCredentialStore::new();
        store
            .insert(CredentialRecord::new(
                "staff1",
                "Staff One",
                hash_password(STAFF_PASSWORD)?,
                Role::User,
            ))
            .await?;
        store
            .insert(CredentialRecord::new(
                "manager",
                "Manager One",
                hash_password(MANAGER_PASSWORD)?,
                Role::Admin,
            ))
            .await?;

        let router = create_app(config, store).await?;
        Ok(Self { router })
    }

    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router request failed")
    }

    /// POST a JSON body with optional extra headers
    pub async fn post_json(
        &self,
        uri: &str,
        body: Value,
        headers: &[(&str, &str)],
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.request(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn get(&self, uri: &str, headers: &[(&str, &str)]) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.request(builder.body(Body::empty()).unwrap()).await
    }

    /// Log in and return (access token, refresh token, response body)
    pub async fn login(&self, username: &str, password: &str) -> (String, String, Value) {
        let response = self
            .post_json(
                "/api/auth/login",
                serde_json::json!({ "username": username, "password": password }),
                &[],
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK, "login should succeed");

        let body = body_json(response).await;
        let access = body["accessToken"].as_str().unwrap().to_string();
        let refresh = body["refreshToken"].as_str().unwrap().to_string();
        (access, refresh, body)
    }
}

/// Collect the response body as JSON
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("body was not valid JSON")
}

/// All `Set-Cookie` values on a response
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_string)
        .collect()
}
