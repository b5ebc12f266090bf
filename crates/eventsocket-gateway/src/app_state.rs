//! Shared application state handed to axum handlers.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::dispatch::EventRouter;

#[derive(Clone)]
pub struct AppState {
    cfg: Arc<GatewayConfig>,
    router: Arc<EventRouter>,
}

impl AppState {
    pub fn new(cfg: GatewayConfig, router: Arc<EventRouter>) -> Self {
        Self {
            cfg: Arc::new(cfg),
            router,
        }
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.cfg
    }

    pub fn router(&self) -> Arc<EventRouter> {
        Arc::clone(&self.router)
    }
}
