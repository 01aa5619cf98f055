//! Member records as held by the credential store, and their public view.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::Identity;

/// Stored member. `password_hash` never leaves the server.
#[derive(Debug, Clone)]
pub struct MemberRecord {
    pub id: Uuid,
    pub membername: String,
    pub password_hash: String,
    pub nickname: String,
    pub activated: bool,
    pub authorities: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl MemberRecord {
    pub fn identity(&self) -> Identity {
        Identity {
            subject: self.membername.clone(),
            authorities: self.authorities.clone(),
        }
    }
}

/// Input to [`crate::db::CredentialStore::save`]; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub membername: String,
    pub password_hash: String,
    pub nickname: String,
    pub activated: bool,
    pub authorities: BTreeSet<String>,
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub membername: String,
    pub nickname: String,
    pub activated: bool,
    pub authorities: Vec<String>,
}

impl From<MemberRecord> for MemberResponse {
    fn from(m: MemberRecord) -> Self {
        Self {
            membername: m.membername,
            nickname: m.nickname,
            activated: m.activated,
            authorities: m.authorities.into_iter().collect(),
        }
    }
}
