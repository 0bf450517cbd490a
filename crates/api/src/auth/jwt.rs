//! Access-token validation.
//!
//! Tokens are issued by the external identity provider and signed with a
//! shared HS256 secret. The `sub` claim is the user's UUID; roles are looked
//! up server-side, never trusted from the token.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use touchgrass_core::config::{env_lookup, required, ConfigError};
use touchgrass_core::types::EntityId;

/// Claims read from every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's id.
    pub sub: EntityId,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    #[serde(default)]
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the identity provider.
    pub secret: String,
    /// Required `aud` claim; unchecked when `None`.
    pub audience: Option<String>,
}

impl JwtConfig {
    /// | Env Var        | Required | Default |
    /// |----------------|----------|---------|
    /// | `JWT_SECRET`   | **yes**  | --      |
    /// | `JWT_AUDIENCE` | no       | unset   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            secret: required(lookup, "JWT_SECRET")?,
            audience: lookup("JWT_AUDIENCE")
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty()),
        })
    }
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Checks the signature and expiry, plus the audience when one is configured.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    match &config.audience {
        Some(audience) => validation.set_audience(&[audience]),
        None => validation.validate_aud = false,
    }
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

/// Sign a token for `user_id` valid for `ttl`.
///
/// Production tokens come from the identity provider; this is for local
/// tooling and tests.
pub fn generate_token(
    user_id: EntityId,
    ttl: chrono::Duration,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        exp: now + ttl.num_seconds(),
        iat: now,
        aud: config.audience.clone(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use uuid::Uuid;

    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            audience: None,
        }
    }

    #[test]
    fn generated_token_validates() {
        let config = test_config();
        let user_id = Uuid::new_v4();
        let token = generate_token(user_id, Duration::minutes(15), &config).unwrap();

        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_fails() {
        let config = test_config();
        // Well beyond the default 60-second leeway.
        let token = generate_token(Uuid::new_v4(), Duration::minutes(-5), &config).unwrap();
        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn different_secret_fails() {
        let token = generate_token(Uuid::new_v4(), Duration::minutes(5), &test_config()).unwrap();
        let other = JwtConfig {
            secret: "another-secret".to_string(),
            audience: None,
        };
        assert!(validate_token(&token, &other).is_err());
    }

    #[test]
    fn audience_is_enforced_when_configured() {
        let issuer = JwtConfig {
            audience: Some("anon".into()),
            ..test_config()
        };
        let token = generate_token(Uuid::new_v4(), Duration::minutes(5), &issuer).unwrap();

        let expected = JwtConfig {
            audience: Some("authenticated".into()),
            ..test_config()
        };
        assert!(validate_token(&token, &expected).is_err());
        assert!(validate_token(&token, &issuer).is_ok());
    }
}
