//! HS256 bearer tokens. The role claim is informational; mutation gating
//! re-checks the user row so a role change takes effect immediately.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::app_config::AuthConfig;
use crate::db::models::User;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the user's id.
    pub sub: Uuid,
    pub role: String,
    /// Expiration (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at (UTC Unix timestamp).
    pub iat: i64,
}

#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub expiry_mins: i64,
}

impl From<&AuthConfig> for TokenConfig {
    fn from(auth: &AuthConfig) -> Self {
        Self {
            secret: auth.token_secret.clone(),
            expiry_mins: auth.token_expiry_mins,
        }
    }
}

pub fn generate(user: &User, config: &TokenConfig) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user.id,
        role: user.role.clone(),
        exp: now + config.expiry_mins * 60,
        iat: now,
    };
    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

pub fn validate(token: &str, config: &TokenConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // validates signature and exp
    )?;
    Ok(data.claims)
}
