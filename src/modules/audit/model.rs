use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use edugate_audit::DenialRecord;

#[derive(Debug, Deserialize, IntoParams)]
pub struct DenialQuery {
    /// Maximum records to return, clamped to 1-500 (default 50)
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DenialListResponse {
    pub data: Vec<DenialRecord>,
    pub limit: i64,
}
