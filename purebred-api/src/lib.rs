use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

pub mod config;
pub mod models;
pub mod routes;
#[cfg(feature = "postgres")]
pub mod schema;
pub mod services;
pub mod store;

use crate::config::AppConfig;
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: AppConfig,
    /// Present when the Prometheus recorder was installed at startup.
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Self {
        Self {
            store,
            config,
            metrics_handle: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}
