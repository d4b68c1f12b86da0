//! Connectivity preflight — fail fast before a wasted round trip.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::CoreConfig;

/// Reports whether the network currently looks reachable.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn is_reachable(&self) -> bool;
}

/// Probe that pings the marketplace API base URL.
///
/// Any HTTP response counts as reachable — a 404 still proves the
/// network path works.
pub struct HttpConnectivityProbe {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpConnectivityProbe {
    pub fn new(config: &CoreConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.api_base_url.clone(),
            timeout: config.media.preflight_timeout,
        }
    }
}

#[async_trait]
impl ConnectivityProbe for HttpConnectivityProbe {
    async fn is_reachable(&self) -> bool {
        self.client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .is_ok()
    }
}
