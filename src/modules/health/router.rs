use axum::{Router, routing::get};

use crate::routes::{HEALTH, METRICS};
use crate::state::AppState;

use super::controller::{health, metrics};

pub fn init_health_router() -> Router<AppState> {
    Router::new()
        .route(HEALTH, get(health))
        .route(METRICS, get(metrics))
}
