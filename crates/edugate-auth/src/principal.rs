use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::claims::Claims;
use crate::jwt::TokenError;

/// The authenticated identity attached to a request.
///
/// `role` is kept as the raw string from the token. It is normalized by the
/// portal stage of the guard pipeline, which rejects unknown roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Principal {
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
    pub tenant_id: Option<Uuid>,
    pub academic_year_id: Option<Uuid>,
    pub school_level_id: Option<Uuid>,
    pub class_id: Option<Uuid>,
}

impl Principal {
    pub fn new(user_id: Uuid, email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
            role: role.into(),
            tenant_id: None,
            academic_year_id: None,
            school_level_id: None,
            class_id: None,
        }
    }

    pub fn with_tenant(mut self, tenant_id: Uuid) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }
}

impl TryFrom<Claims> for Principal {
    type Error = TokenError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| TokenError::InvalidSubject)?;

        Ok(Self {
            user_id,
            email: claims.email,
            role: claims.role,
            tenant_id: claims.tenant_id,
            academic_year_id: claims.academic_year_id,
            school_level_id: claims.school_level_id,
            class_id: claims.class_id,
        })
    }
}
