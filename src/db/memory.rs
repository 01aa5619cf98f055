//! In-process credential store for tests and database-less runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::CredentialStore;
use crate::error::{AppError, AppResult};
use crate::models::{MemberRecord, NewMember};

#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    /// membername -> record
    members: Arc<RwLock<HashMap<String, MemberRecord>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_membername(&self, membername: &str) -> AppResult<Option<MemberRecord>> {
        Ok(self.members.read().await.get(membername).cloned())
    }

    async fn save(&self, member: NewMember) -> AppResult<MemberRecord> {
        let mut members = self.members.write().await;
        if members.contains_key(&member.membername) {
            return Err(AppError::Conflict(format!(
                "Member {} is already registered",
                member.membername
            )));
        }
        let record = MemberRecord {
            id: Uuid::new_v4(),
            membername: member.membername,
            password_hash: member.password_hash,
            nickname: member.nickname,
            activated: member.activated,
            authorities: member.authorities,
            created_at: Utc::now(),
        };
        members.insert(record.membername.clone(), record.clone());
        Ok(record)
    }
}
