//! JWT generation and validation for the two token kinds the backend mints.
//!
//! Access tokens are HS256-signed JWTs carrying the full identity claim set
//! and live for 24 hours. SSO handoff tokens carry only `{sub, username}`
//! and live for 5 minutes; their sole purpose is to let JupyterHub's
//! token-login page authenticate the user without credentials. Because the
//! access-token claims are a superset, an access token also decodes as
//! [`SsoClaims`] wherever a handoff token is accepted.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use hubgate_core::types::DbId;

/// Claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// The reduced claim set of an SSO handoff token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SsoClaims {
    pub sub: DbId,
    pub username: String,
    pub exp: i64,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in hours (default: 24).
    pub access_expiry_hours: i64,
}

/// Default access token expiry in hours.
const DEFAULT_ACCESS_EXPIRY_HOURS: i64 = 24;

/// SSO handoff token lifetime in minutes.
const SSO_EXPIRY_MINS: i64 = 5;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                   | Required | Default |
    /// |---------------------------|----------|---------|
    /// | `JWT_SECRET`              | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_HOURS` | no       | `24`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty. There is deliberately
    /// no built-in fallback secret: a deployment without an externally
    /// supplied key must refuse to start.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_expiry_hours: i64 = std::env::var("JWT_ACCESS_EXPIRY_HOURS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_HOURS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_HOURS must be a valid i64");

        Self {
            secret,
            access_expiry_hours,
        }
    }
}

/// Generate an HS256 access token for the given user identity.
pub fn generate_access_token(
    user_id: DbId,
    username: &str,
    email: &str,
    is_admin: bool,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + config.access_expiry_hours * 3600;

    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        email: email.to_string(),
        is_admin,
        exp,
        iat: now,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Generate a 5-minute SSO handoff token naming the user.
pub fn generate_login_token(
    user_id: DbId,
    username: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = SsoClaims {
        sub: user_id,
        username: username.to_string(),
        exp: now + SSO_EXPIRY_MINS * 60,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration automatically.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// Validate a token as an SSO claim set.
///
/// Accepts both handoff tokens and full access tokens (whose claims are a
/// superset of [`SsoClaims`]).
pub fn validate_login_token(
    token: &str,
    config: &JwtConfig,
) -> Result<SsoClaims, jsonwebtoken::errors::Error> {
    let token_data = decode::<SsoClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
