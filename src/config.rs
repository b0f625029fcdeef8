//! Service configuration.
//!
//! All transport knobs live in one immutable value constructed at
//! startup and shared read-only by the handlers.

use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

const DEFAULT_PORT: u16 = 7860;
const DEFAULT_SOLVE_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    /// Exact origins allowed by CORS; empty means any origin.
    pub allowed_origins: Vec<String>,
    /// Wall-clock budget for one solve.
    pub solve_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            allowed_origins: Vec::new(),
            solve_timeout: Duration::from_secs(DEFAULT_SOLVE_TIMEOUT_SECS),
        }
    }
}

impl ServiceConfig {
    /// Reads overrides from `PORT`, `ALLOWED_ORIGINS` (comma separated)
    /// and `SOLVE_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            config.bind_addr = SocketAddr::from(([0, 0, 0, 0], port));
        }
        if let Ok(origins) = std::env::var("ALLOWED_ORIGINS") {
            config.allowed_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if let Some(secs) = std::env::var("SOLVE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.solve_timeout = Duration::from_secs(secs);
        }
        config
    }

    /// CORS layer for the configured origin allow-list.
    pub fn cors_layer(&self) -> CorsLayer {
        let origin = if self.allowed_origins.is_empty() {
            AllowOrigin::any()
        } else {
            AllowOrigin::list(
                self.allowed_origins
                    .iter()
                    .filter_map(|o| o.parse::<HeaderValue>().ok()),
            )
        };
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
