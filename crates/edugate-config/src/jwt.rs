use std::env;

use thiserror::Error;

use crate::bypass::Environment;

/// Signing secret accepted only in development when `JWT_SECRET` is unset.
pub const DEVELOPMENT_SECRET: &str = "edugate-development-secret";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtConfigError {
    #[error("JWT_SECRET must be set when APP_ENV is {0}")]
    MissingSecret(Environment),
}

/// Settings used to verify incoming access tokens.
///
/// Tokens are issued elsewhere; this service only checks their signature
/// and expiry.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Allowed clock skew in seconds when validating `exp`.
    pub leeway: u64,
}

impl JwtConfig {
    pub fn from_env(environment: Environment) -> Result<Self, JwtConfigError> {
        let leeway = env::var("JWT_LEEWAY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Self::resolve(env::var("JWT_SECRET").ok(), leeway, environment)
    }

    /// A blank or missing secret falls back to [`DEVELOPMENT_SECRET`] in
    /// development and is an error everywhere else.
    pub fn resolve(
        secret: Option<String>,
        leeway: u64,
        environment: Environment,
    ) -> Result<Self, JwtConfigError> {
        let secret = match secret.filter(|s| !s.trim().is_empty()) {
            Some(secret) => secret,
            None if environment.is_development() => {
                tracing::warn!("JWT_SECRET is not set; using the development secret");
                DEVELOPMENT_SECRET.to_string()
            }
            None => return Err(JwtConfigError::MissingSecret(environment)),
        };

        Ok(Self { secret, leeway })
    }

    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            leeway: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_secret_is_rejected_outside_development() {
        for environment in [Environment::Production, Environment::Staging] {
            assert_eq!(
                JwtConfig::resolve(None, 30, environment).unwrap_err(),
                JwtConfigError::MissingSecret(environment)
            );
            assert!(JwtConfig::resolve(Some("  ".to_string()), 30, environment).is_err());
        }
    }

    #[test]
    fn test_development_falls_back_to_local_secret() {
        let config = JwtConfig::resolve(None, 30, Environment::Development).unwrap();
        assert_eq!(config.secret, DEVELOPMENT_SECRET);
        assert_eq!(config.leeway, 30);
    }

    #[test]
    fn test_configured_secret_is_used() {
        let config =
            JwtConfig::resolve(Some("s3cret".to_string()), 5, Environment::Production).unwrap();
        assert_eq!(config.secret, "s3cret");
        assert_eq!(config.leeway, 5);
    }
}
