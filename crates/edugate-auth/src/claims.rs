//! JWT claim structure for access tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// JWT claims for access tokens.
///
/// # Fields
///
/// - `sub`: User ID (subject)
/// - `email`: User's email address
/// - `role`: Raw role name as stored by the identity service
/// - `tenant_id`: School (tenant) scope, absent for platform staff
/// - `academic_year_id`, `school_level_id`, `class_id`: context the user is
///   currently working in, when the identity service knows it
/// - `exp`: Token expiration timestamp
/// - `iat`: Token issued-at timestamp
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    /// User's email address
    pub email: String,
    /// Raw role string, normalized later by the authorization engine
    pub role: String,
    #[serde(default)]
    pub tenant_id: Option<Uuid>,
    #[serde(default)]
    pub academic_year_id: Option<Uuid>,
    #[serde(default)]
    pub school_level_id: Option<Uuid>,
    #[serde(default)]
    pub class_id: Option<Uuid>,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}
