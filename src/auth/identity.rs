//! Who is making the request: subject name plus granted authorities.

use std::collections::BTreeSet;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

pub const ROLE_MEMBER: &str = "ROLE_MEMBER";
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// Authenticated principal. Built either from a credential record at login
/// or from the claims of a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub authorities: BTreeSet<String>,
}

impl Identity {
    pub fn new<I, S>(subject: impl Into<String>, authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subject: subject.into(),
            authorities: authorities.into_iter().map(Into::into).collect(),
        }
    }

    /// True when at least one of `roles` is granted.
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|r| self.authorities.contains(*r))
    }

    /// Authorities joined with `,` as carried in the token's `auth` claim.
    pub fn authorities_claim(&self) -> String {
        self.authorities
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Inverse of [`Identity::authorities_claim`]; empty segments are dropped.
    pub fn parse_authorities(claim: &str) -> BTreeSet<String> {
        claim
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Per-request execution context. Attached once by the identity interceptor,
/// then only read.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    identity: Option<Identity>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}

/// Extractor: the context attached by the interceptor, or an anonymous one
/// when the interceptor did not run for this route.
#[axum::async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorities_claim_round_trips() {
        let id = Identity::new("alice", [ROLE_MEMBER, ROLE_ADMIN]);
        let claim = id.authorities_claim();
        assert_eq!(claim, "ROLE_ADMIN,ROLE_MEMBER");
        assert_eq!(Identity::parse_authorities(&claim), id.authorities);
    }

    #[test]
    fn empty_claim_is_empty_set() {
        assert!(Identity::parse_authorities("").is_empty());
        assert!(Identity::parse_authorities(",,").is_empty());
    }

    #[test]
    fn has_any_role_is_logical_or() {
        let id = Identity::new("bob", [ROLE_MEMBER]);
        assert!(id.has_any_role(&[ROLE_MEMBER, ROLE_ADMIN]));
        assert!(!id.has_any_role(&[ROLE_ADMIN]));
        assert!(!id.has_any_role(&[]));
    }

    #[test]
    fn anonymous_context_has_no_identity() {
        assert!(RequestContext::anonymous().identity().is_none());
        let ctx = RequestContext::authenticated(Identity::new("bob", [ROLE_MEMBER]));
        assert_eq!(ctx.identity().map(|i| i.subject.as_str()), Some("bob"));
    }
}
