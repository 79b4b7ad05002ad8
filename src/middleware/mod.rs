//! Request middleware and extractors.
//!
//! - [`auth`]: bearer token parsing and the [`auth::AuthUser`] extractor
//! - [`guard`]: runs the authorization pipeline for every routed request
//!
//! # Request flow
//!
//! 1. [`guard::authorize`] reads `Authorization: Bearer <token>` and, when
//!    the token verifies, builds a [`edugate_auth::Principal`]
//! 2. The guard pipeline decides using the route's metadata from
//!    [`crate::routes::route_table`]
//! 3. On acceptance the principal and the
//!    [`edugate_authz::RequestAnnotations`] are placed in request extensions
//! 4. Handlers read them with [`auth::AuthUser`] and [`auth::Annotations`]

pub mod auth;
pub mod guard;
