use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::get_bypass_report;

pub fn init_dev_router() -> Router<AppState> {
    Router::new().route("/bypass", get(get_bypass_report))
}
