//! Credential store boundary
//!
//! The production credential store is an external document database; this
//! subsystem only consumes the lookup interface below. The in-memory
//! implementation backs tests and local development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use pricewatch_auth::{Role, UserProfile};
use pricewatch_common::{Error, Result};

/// Stored credential record. Carries the password hash and is never
/// returned to clients directly.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub id: String,
    pub username: String,
    pub staff_name: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CredentialRecord {
    pub fn new(username: &str, staff_name: &str, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            staff_name: staff_name.to_string(),
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Public view of this record
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            username: self.username.clone(),
            staff_name: self.staff_name.clone(),
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Lookup interface over the external credential store
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<CredentialRecord>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<CredentialRecord>>;

    async fn list_profiles(&self) -> Result<Vec<UserProfile>>;

    /// Insert a new record; fails if the username is taken
    async fn insert(&self, record: CredentialRecord) -> Result<()>;
}

/// In-memory credential store for tests and local development
#[derive(Default)]
pub struct MemoryCredentialStore {
    records: RwLock<HashMap<String, CredentialRecord>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<CredentialRecord>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| r.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<CredentialRecord>> {
        let records = self.records.read().await;
        Ok(records.get(id).cloned())
    }

    async fn list_profiles(&self) -> Result<Vec<UserProfile>> {
        let records = self.records.read().await;
        let mut profiles: Vec<UserProfile> = records.values().map(|r| r.profile()).collect();
        profiles.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(profiles)
    }

    async fn insert(&self, record: CredentialRecord) -> Result<()> {
        let mut records = self.records.write().await;
        if records.values().any(|r| r.username == record.username) {
            return Err(Error::Validation(format!(
                "username '{}' already exists",
                record.username
            )));
        }
        records.insert(record.id.clone(), record);
        Ok(())
    }
}
