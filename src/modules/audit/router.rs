use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_recent_denials, get_user_denials};

pub fn init_audit_router() -> Router<AppState> {
    Router::new()
        .route("/denials", get(get_recent_denials))
        .route("/denials/users/{user_id}", get(get_user_denials))
}
