//! Member registration, lookup, and admin bootstrap.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::auth::{Identity, PasswordEncoder, ROLE_ADMIN, ROLE_MEMBER};
use crate::db::CredentialStore;
use crate::error::{AppError, AppResult};
use crate::models::{MemberRecord, NewMember};

#[derive(Clone)]
pub struct MemberService {
    store: Arc<dyn CredentialStore>,
    encoder: Arc<dyn PasswordEncoder>,
}

impl MemberService {
    pub fn new(store: Arc<dyn CredentialStore>, encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self { store, encoder }
    }

    /// Register an active member holding `ROLE_MEMBER` only.
    pub async fn signup(
        &self,
        membername: &str,
        password: &str,
        nickname: &str,
    ) -> AppResult<MemberRecord> {
        self.register(membername, password, nickname, [ROLE_MEMBER])
            .await
    }

    /// Create the admin account unless a member with that name already exists.
    /// Returns whether it was created.
    pub async fn ensure_admin(&self, membername: &str, password: &str) -> AppResult<bool> {
        if self.store.find_by_membername(membername).await?.is_some() {
            debug!(membername = %membername, "admin already present");
            return Ok(false);
        }
        self.register(membername, password, membername, [ROLE_MEMBER, ROLE_ADMIN])
            .await?;
        info!(membername = %membername, "admin member created");
        Ok(true)
    }

    pub async fn get_member_with_authorities(&self, membername: &str) -> AppResult<MemberRecord> {
        self.store
            .find_by_membername(membername)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", membername)))
    }

    /// Record of the caller identified by the request's token.
    pub async fn get_my_member_with_authorities(
        &self,
        identity: &Identity,
    ) -> AppResult<MemberRecord> {
        self.get_member_with_authorities(&identity.subject).await
    }

    async fn register<const N: usize>(
        &self,
        membername: &str,
        password: &str,
        nickname: &str,
        authorities: [&str; N],
    ) -> AppResult<MemberRecord> {
        if self.store.find_by_membername(membername).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Member {} is already registered",
                membername
            )));
        }
        let member = NewMember {
            membername: membername.to_string(),
            password_hash: self.encoder.hash(password)?,
            nickname: nickname.to_string(),
            activated: true,
            authorities: authorities
                .into_iter()
                .map(str::to_string)
                .collect::<BTreeSet<_>>(),
        };
        let saved = self.store.save(member).await?;
        debug!(membername = %saved.membername, "member registered");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Argon2Encoder;
    use crate::db::MemoryCredentialStore;

    fn service() -> MemberService {
        MemberService::new(
            Arc::new(MemoryCredentialStore::new()),
            Arc::new(Argon2Encoder),
        )
    }

    #[tokio::test]
    async fn signup_stores_active_member_with_member_role_and_hashed_password() {
        let svc = service();
        let m = svc.signup("alice", "secret123", "A").await.unwrap();
        assert!(m.activated);
        assert_eq!(m.nickname, "A");
        assert_eq!(
            m.authorities.iter().map(String::as_str).collect::<Vec<_>>(),
            vec![ROLE_MEMBER]
        );
        assert_ne!(m.password_hash, "secret123");
        assert!(Argon2Encoder.verify("secret123", &m.password_hash).unwrap());
    }

    #[tokio::test]
    async fn duplicate_signup_is_conflict() {
        let svc = service();
        svc.signup("alice", "secret123", "A").await.unwrap();
        assert!(matches!(
            svc.signup("alice", "other", "B").await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn lookups() {
        let svc = service();
        svc.signup("alice", "secret123", "A").await.unwrap();
        let me = svc
            .get_my_member_with_authorities(&Identity::new("alice", [ROLE_MEMBER]))
            .await
            .unwrap();
        assert_eq!(me.membername, "alice");
        assert!(matches!(
            svc.get_member_with_authorities("ghost").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn ensure_admin_is_idempotent() {
        let svc = service();
        assert!(svc.ensure_admin("root", "rootpass").await.unwrap());
        assert!(!svc.ensure_admin("root", "changed").await.unwrap());
        let admin = svc.get_member_with_authorities("root").await.unwrap();
        assert!(admin.authorities.contains(ROLE_ADMIN));
        assert!(admin.authorities.contains(ROLE_MEMBER));
    }
}
