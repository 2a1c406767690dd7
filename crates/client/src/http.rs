//! reqwest-backed transport
//!
//! Uses a cookie store so the HttpOnly access/refresh cookies set by the
//! server flow back on subsequent requests, mirroring a browser client.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::transport::{AuthTransport, LoginData, MeData, RefreshData, TransportError};

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorDetail {
    message: String,
}

/// HTTP transport against a running Pricewatch API
pub struct HttpAuthTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAuthTransport {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn handle<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TransportError> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(TransportError::Unauthorized);
        }
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))
    }
}

#[async_trait]
impl AuthTransport for HttpAuthTransport {
    async fn login(&self, username: &str, password: &str) -> Result<LoginData, TransportError> {
        let response = self
            .client
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Self::handle(response).await
    }

    async fn refresh(&self) -> Result<RefreshData, TransportError> {
        let response = self
            .client
            .post(format!("{}/api/auth/refresh", self.base_url))
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Self::handle(response).await
    }

    async fn me(&self) -> Result<MeData, TransportError> {
        let response = self
            .client
            .get(format!("{}/api/auth/me", self.base_url))
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Self::handle(response).await
    }

    async fn logout(&self) -> Result<(), TransportError> {
        let response = self
            .client
            .post(format!("{}/api/auth/logout", self.base_url))
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(TransportError::Rejected {
                status: status.as_u16(),
                message: status.to_string(),
            })
        }
    }
}
