//! Session manager: profile cache and proactive token renewal
//!
//! At most one renewal task is pending at any time; scheduling a new one
//! aborts the previous task, so rapid re-login/logout cycles never race
//! two refresh calls. Aborting an already-finished task is a no-op.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use pricewatch_auth::UserProfile;

use crate::transport::{AuthTransport, TransportError};

/// Renewal fires this long before the access token expires
pub const RENEWAL_LEEWAY_MS: i64 = 60_000;

struct Inner {
    profile: Option<UserProfile>,
    renewal: Option<JoinHandle<()>>,
}

/// Client-side session state and renewal scheduling
#[derive(Clone)]
pub struct SessionManager {
    transport: Arc<dyn AuthTransport>,
    inner: Arc<Mutex<Inner>>,
}

/// Time until renewal should fire for a token expiring at `expiry_ms`
fn renewal_delay(expiry_ms: i64, now_ms: i64) -> Duration {
    let delay_ms = (expiry_ms - RENEWAL_LEEWAY_MS - now_ms).max(0);
    Duration::from_millis(delay_ms as u64)
}

impl SessionManager {
    pub fn new(transport: Arc<dyn AuthTransport>) -> Self {
        Self {
            transport,
            inner: Arc::new(Mutex::new(Inner {
                profile: None,
                renewal: None,
            })),
        }
    }

    /// Currently signed-in profile, if any
    pub fn current_user(&self) -> Option<UserProfile> {
        self.lock().profile.clone()
    }

    /// Authenticate and start the renewal cycle
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserProfile, TransportError> {
        let data = self.transport.login(username, password).await?;

        self.lock().profile = Some(data.user.clone());
        self.schedule_renewal(data.access_token_expiry);

        Ok(data.user)
    }

    /// Restore a previous session on process start.
    ///
    /// Failure is silent: an expired or missing session just leaves the
    /// manager signed out.
    pub async fn restore(&self) -> Option<UserProfile> {
        match self.transport.me().await {
            Ok(data) => {
                self.lock().profile = Some(data.user.clone());
                self.schedule_renewal(data.access_token_expiry);
                Some(data.user)
            }
            Err(err) => {
                tracing::debug!(error = %err, "No session to restore");
                self.clear();
                None
            }
        }
    }

    /// Cancel renewal, drop local state, and clear the server cookies
    pub async fn logout(&self) {
        self.clear();
        if let Err(err) = self.transport.logout().await {
            // Local state is already cleared; the cookies expire on their own.
            tracing::warn!(error = %err, "Server logout failed");
        }
    }

    fn clear(&self) {
        let mut inner = self.lock();
        inner.profile = None;
        if let Some(handle) = inner.renewal.take() {
            handle.abort();
        }
    }

    fn schedule_renewal(&self, expiry_ms: i64) {
        let transport = self.transport.clone();
        let inner_arc = self.inner.clone();

        let mut inner = self.lock();

        // Cancel-before-reschedule: never two pending renewals.
        if let Some(handle) = inner.renewal.take() {
            handle.abort();
        }

        let handle = tokio::spawn(async move {
            let mut expiry_ms = expiry_ms;
            loop {
                let delay = renewal_delay(expiry_ms, Utc::now().timestamp_millis());
                tokio::time::sleep(delay).await;

                match transport.refresh().await {
                    Ok(data) => {
                        let mut inner = inner_arc
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner);
                        inner.profile = Some(data.user);
                        expiry_ms = data.access_token_expiry;
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "Token renewal failed, clearing session");
                        let mut inner = inner_arc
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner);
                        inner.profile = None;
                        inner.renewal = None;
                        break;
                    }
                }
            }
        });

        inner.renewal = Some(handle);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
