//! # Edugate Auth
//!
//! Authentication types for the Edugate API.
//!
//! Token issuance lives in the identity service; this crate only verifies
//! access tokens and turns their claims into a [`Principal`], the
//! authenticated identity every authorization decision starts from.
//!
//! - [`claims`]: JWT access-token claims
//! - [`jwt`]: token verification
//! - [`principal`]: the authenticated principal
//!
//! # Example
//!
//! ```ignore
//! use edugate_auth::{verify_token, Principal};
//! use edugate_config::JwtConfig;
//!
//! let claims = verify_token(token, &JwtConfig::from_env(environment)?)?;
//! let principal = Principal::try_from(claims)?;
//! println!("{} acts as {}", principal.email, principal.role);
//! ```

pub mod claims;
pub mod jwt;
pub mod principal;

pub use claims::Claims;
pub use jwt::{TokenError, verify_token};
pub use principal::Principal;
