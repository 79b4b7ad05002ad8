//! # Edugate Core
//!
//! Foundational types shared by every Edugate crate.
//!
//! - [`errors`]: the application error type and its HTTP response conversion
//!
//! # Example
//!
//! ```ignore
//! use edugate_core::AppError;
//!
//! let error = AppError::forbidden("Access denied. Module 'finance' requires 'read'".to_string());
//! ```

pub mod errors;

pub use errors::{AppError, ErrorResponse};
