//! Credential authentication: membername + password -> Identity.

use std::sync::Arc;

use tracing::info;

use super::identity::Identity;
use super::password::{PasswordEncoder, UNMATCHABLE_DIGEST};
use crate::db::CredentialStore;
use crate::error::{AppError, AppResult};

/// Why a login was refused. Logged, never sent to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("unknown principal")]
    UnknownPrincipal,
    #[error("account disabled")]
    AccountDisabled,
    #[error("bad credentials")]
    BadCredentials,
}

#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    encoder: Arc<dyn PasswordEncoder>,
}

impl Authenticator {
    pub fn new(store: Arc<dyn CredentialStore>, encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self { store, encoder }
    }

    /// Store/hash failures come back as their own `AppError`; refusals as
    /// `AppError::Authentication`.
    pub async fn authenticate(&self, membername: &str, password: &str) -> AppResult<Identity> {
        let result = self.check(membername, password).await;
        if let Err(AppError::Authentication(kind)) = &result {
            info!(membername = %membername, reason = %kind, "authentication refused");
        }
        result
    }

    async fn check(&self, membername: &str, password: &str) -> AppResult<Identity> {
        let Some(member) = self.store.find_by_membername(membername).await? else {
            // same hashing cost as a wrong password, so timing does not reveal unknown names
            let _ = self.encoder.verify(password, UNMATCHABLE_DIGEST);
            return Err(AuthError::UnknownPrincipal.into());
        };

        if !member.activated {
            return Err(AuthError::AccountDisabled.into());
        }
        if !self.encoder.verify(password, &member.password_hash)? {
            return Err(AuthError::BadCredentials.into());
        }
        Ok(member.identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::Argon2Encoder;
    use crate::auth::{ROLE_ADMIN, ROLE_MEMBER};
    use crate::db::MemoryCredentialStore;
    use crate::models::NewMember;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn fixture() -> Authenticator {
        let store = MemoryCredentialStore::new();
        let encoder = Argon2Encoder;
        for (name, active, roles) in [
            ("alice", true, vec![ROLE_MEMBER, ROLE_ADMIN]),
            ("bob", false, vec![ROLE_MEMBER]),
        ] {
            store
                .save(NewMember {
                    membername: name.to_string(),
                    password_hash: encoder.hash("correct-horse").unwrap(),
                    nickname: name.to_string(),
                    activated: active,
                    authorities: roles.into_iter().map(String::from).collect(),
                })
                .await
                .unwrap();
        }
        Authenticator::new(Arc::new(store), Arc::new(encoder))
    }

    /// Delegates to Argon2 and counts `verify` calls.
    #[derive(Default)]
    struct CountingEncoder {
        verifies: AtomicUsize,
    }

    impl PasswordEncoder for CountingEncoder {
        fn hash(&self, password: &str) -> AppResult<String> {
            Argon2Encoder.hash(password)
        }

        fn verify(&self, password: &str, digest: &str) -> AppResult<bool> {
            self.verifies.fetch_add(1, Ordering::SeqCst);
            Argon2Encoder.verify(password, digest)
        }
    }

    fn kind(err: AppError) -> AuthError {
        match err {
            AppError::Authentication(k) => k,
            other => panic!("expected authentication error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn valid_credentials_yield_identity() {
        let auth = fixture().await;
        let id = auth.authenticate("alice", "correct-horse").await.unwrap();
        assert_eq!(id, Identity::new("alice", [ROLE_ADMIN, ROLE_MEMBER]));
    }

    #[tokio::test]
    async fn disabled_account_fails_even_with_correct_password() {
        let auth = fixture().await;
        let err = auth.authenticate("bob", "correct-horse").await.unwrap_err();
        assert_eq!(kind(err), AuthError::AccountDisabled);
    }

    #[tokio::test]
    async fn unknown_member_is_unknown_principal() {
        let auth = fixture().await;
        let err = auth.authenticate("ghost", "anything").await.unwrap_err();
        assert_eq!(kind(err), AuthError::UnknownPrincipal);
    }

    #[tokio::test]
    async fn unknown_member_costs_one_hash_verification_like_a_wrong_password() {
        let store = MemoryCredentialStore::new();
        store
            .save(NewMember {
                membername: "alice".to_string(),
                password_hash: Argon2Encoder.hash("correct-horse").unwrap(),
                nickname: "A".to_string(),
                activated: true,
                authorities: Default::default(),
            })
            .await
            .unwrap();
        let encoder = Arc::new(CountingEncoder::default());
        let auth = Authenticator::new(Arc::new(store), encoder.clone());

        let err = auth.authenticate("ghost", "anything").await.unwrap_err();
        assert_eq!(kind(err), AuthError::UnknownPrincipal);
        assert_eq!(encoder.verifies.load(Ordering::SeqCst), 1);

        let err = auth.authenticate("alice", "wrong").await.unwrap_err();
        assert_eq!(kind(err), AuthError::BadCredentials);
        assert_eq!(encoder.verifies.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn wrong_password_is_bad_credentials() {
        let auth = fixture().await;
        let err = auth.authenticate("alice", "wrong").await.unwrap_err();
        assert_eq!(kind(err), AuthError::BadCredentials);
    }
}
