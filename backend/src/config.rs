//! Server settings loaded via OrthoConfig.
//!
//! Values come from `RECIPES_*` environment variables, an optional config
//! file and CLI arguments, in increasing order of precedence.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";

/// Runtime settings for the recipe server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECIPES")]
pub struct AppSettings {
    /// Listener address.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. Fixture adapters are used when unset.
    pub database_url: Option<String>,
    /// Maximum connections held by the pool.
    pub pool_max_size: Option<u32>,
    /// File holding the session cookie key material.
    pub session_key_file: Option<PathBuf>,
    /// Generate a temporary session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Set the `Secure` flag on the session cookie.
    pub session_cookie_secure: Option<bool>,
    /// Externally visible origin used to build short links.
    pub public_base_url: Option<String>,
    /// Apply embedded migrations before serving.
    pub run_migrations: Option<bool>,
}

impl AppSettings {
    /// Listener address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Pool size, falling back to 10.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Session key path, falling back to the mounted secret location.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Whether session cookies are marked `Secure`; on unless disabled.
    pub fn session_cookie_secure(&self) -> bool {
        self.session_cookie_secure.unwrap_or(true)
    }

    /// Origin for short links without a trailing slash.
    pub fn public_base_url(&self) -> &str {
        self.public_base_url
            .as_deref()
            .unwrap_or(DEFAULT_PUBLIC_BASE_URL)
            .trim_end_matches('/')
    }

    /// Whether migrations run at start; on unless disabled.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }
}
