//! Identity-provider credential validation.
//!
//! Credentials are HS256-signed JWTs carrying a [`Claims`] payload. The
//! `admin` claim is trusted as issued; `iss` and `aud` are checked only when
//! configured.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by an identity-provider credential.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the identity-provider user id, used as `users.id`.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Administrator flag.
    #[serde(default)]
    pub admin: bool,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Unique token identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

/// Configuration for credential validation.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC-SHA256 secret shared with the identity provider.
    pub secret: String,
    /// Expected `iss`, when set.
    pub issuer: Option<String>,
    /// Expected `aud`, when set.
    pub audience: Option<String>,
}

impl AuthConfig {
    /// Load credential settings from environment variables.
    ///
    /// | Env Var           | Required | Default |
    /// |-------------------|----------|---------|
    /// | `AUTH_JWT_SECRET` | **yes**  | --      |
    /// | `AUTH_ISSUER`     | no       | unset   |
    /// | `AUTH_AUDIENCE`   | no       | unset   |
    ///
    /// # Panics
    ///
    /// Panics if `AUTH_JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("AUTH_JWT_SECRET")
            .expect("AUTH_JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "AUTH_JWT_SECRET must not be empty");

        let optional = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        Self {
            secret,
            issuer: optional("AUTH_ISSUER"),
            audience: optional("AUTH_AUDIENCE"),
        }
    }
}

/// Identity fields for an issued credential.
#[derive(Debug, Clone, Default)]
pub struct TokenSubject<'a> {
    pub user_id: &'a str,
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub admin: bool,
}

/// Issue an HS256 credential valid for `ttl_secs`.
///
/// The identity provider issues credentials in production; this exists for
/// integration tests and local development.
pub fn issue_token(
    subject: &TokenSubject<'_>,
    ttl_secs: i64,
    config: &AuthConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: subject.user_id.to_string(),
        email: subject.email.map(str::to_string),
        name: subject.name.map(str::to_string),
        admin: subject.admin,
        exp: now + ttl_secs,
        iat: now,
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
        jti: Some(Uuid::new_v4().to_string()),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a credential, returning the embedded [`Claims`].
///
/// Validates the signature and expiration, plus issuer and audience when
/// configured.
pub fn validate_token(token: &str, config: &AuthConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    match &config.issuer {
        Some(iss) => validation.set_issuer(&[iss]),
        None => {}
    }
    match &config.audience {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            secret: "unit-test-signing-secret-for-league-tokens".to_string(),
            issuer: None,
            audience: None,
        }
    }

    fn subject(admin: bool) -> TokenSubject<'static> {
        TokenSubject {
            user_id: "auth0|42",
            name: Some("Aki"),
            email: Some("aki@example.com"),
            admin,
        }
    }

    #[test]
    fn test_issue_and_validate_token() {
        let config = test_config();
        let token = issue_token(&subject(true), 900, &config).expect("token issue should succeed");

        let claims = validate_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.sub, "auth0|42");
        assert!(claims.admin);
        assert_eq!(claims.email.as_deref(), Some("aki@example.com"));
        assert!(claims.exp > claims.iat);
        assert!(claims.jti.is_some());
    }

    #[test]
    fn test_admin_claim_defaults_to_false() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let raw = serde_json::json!({ "sub": "u1", "exp": now + 600, "iat": now });
        let token = encode(
            &Header::default(),
            &raw,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let claims = validate_token(&token, &config).unwrap();
        assert!(!claims.admin);
        assert!(claims.name.is_none());
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();
        // Well beyond the default 60-second leeway.
        let token = issue_token(&subject(false), -300, &config).unwrap();
        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn test_different_secrets_fail() {
        let token = issue_token(&subject(false), 900, &test_config()).unwrap();
        let other = AuthConfig {
            secret: "secret-bravo".to_string(),
            ..test_config()
        };
        assert!(validate_token(&token, &other).is_err());
    }

    #[test]
    fn test_configured_audience_is_enforced() {
        let issuing = AuthConfig {
            audience: Some("jdl-web".into()),
            ..test_config()
        };
        let token = issue_token(&subject(false), 900, &issuing).unwrap();
        assert!(validate_token(&token, &issuing).is_ok());

        let expecting_other = AuthConfig {
            audience: Some("jdl-admin".into()),
            ..test_config()
        };
        assert!(validate_token(&token, &expecting_other).is_err());
    }
}
