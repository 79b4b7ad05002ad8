//! Access-token verification.

use jsonwebtoken::{DecodingKey, Validation, decode};
use thiserror::Error;

use edugate_config::JwtConfig;

use crate::claims::Claims;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid or expired token")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid user ID in token")]
    InvalidSubject,
}

/// Verifies an access token and returns the embedded claims.
///
/// Validates the HS256 signature and the `exp` claim, allowing
/// `jwt_config.leeway` seconds of clock skew.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    validation.leeway = jwt_config.leeway;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )?;

    Ok(data.claims)
}
