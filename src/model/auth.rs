//! Credential verification and session tokens
//!
//! Session tokens are stateless PASETO v4 local tokens: the only state needed to
//! validate one is the server-wide symmetric key derived from the configured
//! secret. A token is accepted iff it decrypts under the current key and its
//! `exp` claim has not passed. There is no server-side revocation.

use std::sync::Arc;
use std::time::Duration;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Argon2, password_hash};
use chrono::{DateTime, Utc};
use color_eyre::Result;
use color_eyre::eyre::{OptionExt, bail, eyre};
use pasetors::claims::{Claims, ClaimsValidationRules};
use pasetors::keys::SymmetricKey;
use pasetors::token::UntrustedToken;
use pasetors::version4::V4;
use pasetors::{Local, local};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use thiserror::Error;

use crate::config;
use crate::config::Transport;
use crate::model::users::UserId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown username")]
    UnknownUser,
    #[error("Password mismatch")]
    InvalidPassword,
    #[error("Missing session data")]
    MissingClaims,
    #[error("Missing user id on a token")]
    MissingUserId,
    #[error("Invalid session claim {0}")]
    InvalidSessionClaim(&'static str),
}

impl Error {
    /// Failures surfaced to the user as one generic "invalid credentials" message,
    /// so an unknown username and a wrong password cannot be told apart.
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, Self::UnknownUser | Self::InvalidPassword)
    }
}

/// PASETO implicit assertion for session tokens
const SESSION_IMPLICIT: &[u8] = b"MarinaAdminSessionToken";

/// Newtype for session token string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionToken(String);

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Request-scoped session resolved by the guard
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// User authorized by this session
    pub user_id: UserId,
    /// Session token
    pub token: SessionToken,
    /// Session expiration time
    pub expires_at: DateTime<Utc>,
}

struct SessionAuthInner {
    /// Key for session token encryption, derived from the configured secret
    key: SymmetricKey<V4>,
    /// Session lifetime
    ttl: Duration,
    /// Token transport picked for this deployment
    transport: Transport,
}

/// Issues and verifies session tokens
///
/// Shared between the login endpoint and the session guard; cloning is cheap.
#[derive(Clone)]
pub struct SessionAuth(Arc<SessionAuthInner>);

impl SessionAuth {
    pub fn new(config: &config::Auth) -> Result<Self> {
        let mut hasher = Sha3_256::new();
        hasher.update(config.secret.as_bytes());
        let digest = hasher.finalize();
        let key = SymmetricKey::<V4>::from(digest.as_slice())?;

        Ok(Self(Arc::new(SessionAuthInner {
            key,
            ttl: Duration::from_secs(config.session_hours * 60 * 60),
            transport: config.transport,
        })))
    }

    /// Token transport picked for this deployment
    pub fn transport(&self) -> Transport {
        self.0.transport
    }

    /// Lifetime of issued sessions
    pub fn session_ttl(&self) -> Duration {
        self.0.ttl
    }

    /// Creates a new session for an authenticated user
    pub fn issue(&self, user_id: UserId) -> Result<Session> {
        let mut claims = Claims::new_expires_in(&self.0.ttl)?;
        claims.subject(&user_id.to_string())?;
        let expires_at = expires_at(&claims)?;

        let token = local::encrypt(&self.0.key, &claims, None, Some(SESSION_IMPLICIT))?;

        Ok(Session {
            user_id,
            token: SessionToken(token),
            expires_at,
        })
    }

    /// Verifies a session token, returning the carried session on success
    ///
    /// Malformed tokens, tokens encrypted under another key and expired tokens
    /// all fail here; the caller treats every failure the same way.
    pub fn verify(&self, token: &str) -> Result<Session> {
        let untrusted = UntrustedToken::<Local, V4>::try_from(token)?;

        let rules = ClaimsValidationRules::new();
        let trusted = local::decrypt(&self.0.key, &untrusted, &rules, None, Some(SESSION_IMPLICIT))?;

        let claims = trusted.payload_claims().ok_or_eyre(Error::MissingClaims)?;
        let user_id: UserId = claims
            .get_claim("sub")
            .and_then(|sub| sub.as_str())
            .ok_or_eyre(Error::MissingUserId)?
            .parse()?;

        Ok(Session {
            user_id,
            token: SessionToken(token.to_owned()),
            expires_at: expires_at(claims)?,
        })
    }
}

/// Checks a submitted credential pair against the `users` table
///
/// The two failure cases carry distinct internal kinds but the same
/// user-facing category, see [`Error::is_credential_failure`].
pub async fn verify_credentials(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    username: &str,
    password: &str,
) -> Result<UserId> {
    let row: Option<(UserId, String)> =
        sqlx::query_as("select id, password_hash from users where username = ?")
            .bind(username)
            .fetch_optional(db)
            .await?;

    let Some((user_id, stored)) = row else {
        bail!(Error::UnknownUser);
    };

    let hash = PasswordHash::new(&stored)?;
    match Argon2::default().verify_password(password.as_bytes(), &hash) {
        Ok(()) => Ok(user_id),
        Err(password_hash::Error::Password) => bail!(Error::InvalidPassword),
        Err(err) => Err(eyre!("stored password hash is malformed: {err}")),
    }
}

/// Hashes a password into its stored PHC-string representation
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| eyre!("cannot hash password: {err}"))?;
    Ok(hash.to_string())
}

/// Retrieves `expires_at` from the session claims.
fn expires_at(claims: &Claims) -> Result<DateTime<Utc>> {
    let expires_at = claims
        .get_claim("exp")
        .and_then(|exp| exp.as_str())
        .ok_or(Error::InvalidSessionClaim("exp"))?;
    expires_at.parse().map_err(Into::into)
}
