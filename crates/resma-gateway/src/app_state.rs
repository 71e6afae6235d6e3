//! Shared application state for the RESMA gateway.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::obs::metrics::GatewayMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    metrics: GatewayMetrics,
}

impl AppState {
    pub fn new(cfg: GatewayConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                metrics: GatewayMetrics::default(),
            }),
        }
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.inner.metrics
    }
}
