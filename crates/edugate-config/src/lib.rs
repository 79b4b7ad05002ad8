//! # Edugate Config
//!
//! Configuration types for the Edugate API.
//!
//! Every structure is loaded from environment variables, normally after
//! `dotenvy::dotenv()` has populated the process environment:
//!
//! - [`audit`]: denial-log store selection and read limits
//! - [`bypass`]: deployment environment and the platform owner identity
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`jwt`]: JWT verification configuration
//! - [`server`]: listen address
//!
//! # Example
//!
//! ```ignore
//! use edugate_config::{BypassConfig, JwtConfig};
//!
//! let bypass_config = BypassConfig::from_env();
//! let jwt_config = JwtConfig::from_env(bypass_config.environment)?;
//! ```

pub mod audit;
pub mod bypass;
pub mod cors;
pub mod jwt;
pub mod server;

pub use audit::{AuditConfig, AuditStoreKind};
pub use bypass::{BypassConfig, Environment};
pub use cors::CorsConfig;
pub use jwt::{JwtConfig, JwtConfigError};
pub use server::ServerConfig;
