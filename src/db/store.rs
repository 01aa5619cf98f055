use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{MemberRecord, NewMember};

/// Lookup and persistence of member records, keyed by unique membername.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Member with its authorities, if registered.
    async fn find_by_membername(&self, membername: &str) -> AppResult<Option<MemberRecord>>;

    /// Persist a new member. Fails with `AppError::Conflict` when the name is taken.
    async fn save(&self, member: NewMember) -> AppResult<MemberRecord>;
}
