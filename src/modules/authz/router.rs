use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_me, get_module_roles};

pub fn init_authz_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/modules/{module}/roles", get(get_module_roles))
}
