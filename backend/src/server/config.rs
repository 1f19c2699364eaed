//! Resolved server configuration handed to [`super::create_server`].

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;
use recipe_backend::outbound::persistence::DbPool;

/// Everything the server needs once settings have been validated.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) public_base_url: String,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            public_base_url: public_base_url.into(),
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Use Diesel adapters backed by `pool` instead of fixtures.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[cfg(feature = "metrics")]
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
