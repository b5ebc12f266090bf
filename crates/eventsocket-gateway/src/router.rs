//! Axum router wiring (HTTP -> WS upgrade).
//!
//! `{path}` upgrades with an empty url param, `{path}/:param` captures it.

use axum::{routing::get, Router};

use crate::{app_state::AppState, transport};

pub fn build_router(state: AppState) -> Router {
    let path = state.cfg().gateway.path.clone();
    Router::new()
        .route(&path, get(transport::ws::ws_upgrade))
        .route(&format!("{path}/:param"), get(transport::ws::ws_upgrade_with_param))
        .with_state(state)
}
