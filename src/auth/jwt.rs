//! JWT issue and validation (HS512, compact serialization).

use base64::Engine;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::identity::Identity;

/// HS512 needs a key at least as long as its digest.
pub const MIN_KEY_BYTES: usize = 64;

const ALGORITHM: Algorithm = Algorithm::HS512;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    /// Comma-joined authority names.
    #[serde(default)]
    pub auth: String,
    pub exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("unsupported token")]
    Unsupported,
    /// Issue-side only: `now + validity` does not fit in a timestamp.
    #[error("token expiry out of range")]
    ExpiryOutOfRange,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm
            | ErrorKind::InvalidKeyFormat => TokenError::Unsupported,
            _ => TokenError::Malformed,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("signing secret is not valid Base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("signing key is {0} bytes, HS512 needs at least 64")]
    TooShort(usize),
}

/// Symmetric key material, derived once at startup and read-only afterwards.
#[derive(Clone)]
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    /// Decode a Base64 secret and use the raw bytes as the HMAC key.
    pub fn from_base64(secret: &str) -> Result<Self, KeyError> {
        let bytes = base64::engine::general_purpose::STANDARD.decode(secret.trim())?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() < MIN_KEY_BYTES {
            return Err(KeyError::TooShort(bytes.len()));
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        })
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(..)")
    }
}

/// Issues and verifies bearer tokens binding an [`Identity`].
#[derive(Debug, Clone)]
pub struct TokenCodec {
    key: SigningKey,
    validity: Duration,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(key: SigningKey, validity: Duration) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;
        Self {
            key,
            validity,
            validation,
        }
    }

    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue_with_validity(identity, self.validity)
    }

    /// Issue with an explicit lifetime instead of the configured one.
    pub fn issue_with_validity(
        &self,
        identity: &Identity,
        validity: Duration,
    ) -> Result<String, TokenError> {
        let exp = Utc::now()
            .checked_add_signed(validity)
            .ok_or(TokenError::ExpiryOutOfRange)?
            .timestamp();
        let claims = Claims {
            sub: identity.subject.clone(),
            auth: identity.authorities_claim(),
            exp,
        };
        let token = encode(&Header::new(ALGORITHM), &claims, &self.key.encoding)?;
        debug!(subject = %identity.subject, exp, "issued token");
        Ok(token)
    }

    pub fn decode(&self, token: &str) -> Result<Identity, TokenError> {
        let data = decode::<Claims>(token, &self.key.decoding, &self.validation)?;
        Ok(Identity {
            authorities: Identity::parse_authorities(&data.claims.auth),
            subject: data.claims.sub,
        })
    }

    /// Boolean gate over [`TokenCodec::decode`]. The failure kind is logged, not returned.
    pub fn is_valid(&self, token: &str) -> bool {
        match self.decode(token) {
            Ok(_) => true,
            Err(e) => {
                debug!(reason = %e, "rejected bearer token");
                false
            }
        }
    }
}
