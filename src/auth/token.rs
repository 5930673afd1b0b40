//! Credential-token issue and decode.
//!
//! The token is an HS256 JWT carrying the session identity and role. A
//! session may only be restored from a token whose expiry is strictly in
//! the future at decode time; anything else is rejected and the caller is
//! expected to clear the stored value.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AuthError, Role, Session};

/// Claims carried by the credential token.
#[derive(Debug, Serialize, Deserialize)]
struct PortalClaims {
    /// Subject identifier
    sub: String,
    /// Display name
    name: String,
    /// Login email
    email: String,
    /// Role, rejected at decode time if not a known variant
    role: Role,
    /// Issued at (Unix timestamp)
    iat: i64,
    /// Expiration (Unix timestamp)
    exp: i64,
}

/// Issue a signed credential token for a session, valid for `ttl_hours`.
pub fn issue_token(session: &Session, ttl_hours: i64, secret: &str) -> Result<String> {
    issue_token_expiring_at(session, Utc::now() + Duration::hours(ttl_hours), secret)
}

pub(crate) fn issue_token_expiring_at(
    session: &Session,
    expires_at: DateTime<Utc>,
    secret: &str,
) -> Result<String> {
    let now = Utc::now();
    // Issue time 60 seconds in the past to account for clock drift
    let iat = now - Duration::seconds(60);

    let claims = PortalClaims {
        sub: session.subject_id.clone(),
        name: session.display_name.clone(),
        email: session.email.clone(),
        role: session.role,
        iat: iat.timestamp(),
        exp: expires_at.timestamp(),
    };

    let header = Header::new(Algorithm::HS256);
    let token = encode(&header, &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .context("Failed to encode credential token")?;

    Ok(token)
}

/// Decode a credential token back into a session.
///
/// Fails with `AuthError::InvalidToken` on any signature, structure, role
/// or expiry problem.
pub fn decode_token(token: &str, secret: &str) -> Result<Session, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<PortalClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|err| {
        debug!("Credential token rejected: {}", err);
        AuthError::InvalidToken
    })?;

    // Expiry must be strictly in the future
    if data.claims.exp <= Utc::now().timestamp() {
        return Err(AuthError::InvalidToken);
    }

    Ok(Session {
        subject_id: data.claims.sub,
        display_name: data.claims.name,
        email: data.claims.email,
        role: data.claims.role,
    })
}
