//! Session cookie settings.
//!
//! Derives the signing key and cookie flags from [`AppSettings`]. Release
//! builds insist on a readable key file of at least 64 bytes; debug builds
//! fall back to a temporary key with a warning.

use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use zeroize::Zeroize;

use crate::config::AppSettings;

const SESSION_KEY_MIN_LEN: usize = 64;
// `Key::derive_from` panics below this length.
const DERIVE_MIN_LEN: usize = 32;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Missing or weak keys are tolerated with a warning.
    Debug,
    /// Keys must be present and long enough.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recipe_backend::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Resolved cookie session settings.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Errors raised while preparing the session key.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Resolve session settings for `mode`.
///
/// # Examples
///
/// ```rust
/// use std::ffi::OsString;
///
/// use ortho_config::OrthoConfig;
/// use recipe_backend::config::AppSettings;
/// use recipe_backend::inbound::http::session_config::{BuildMode, session_settings};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_path = std::env::temp_dir().join("recipes_session_key_example");
/// std::fs::write(&key_path, vec![b'k'; 64])?;
///
/// let mut config = AppSettings::load_from_iter([OsString::from("recipe-backend")])?;
/// config.session_key_file = Some(key_path.clone());
/// config.session_cookie_secure = Some(true);
///
/// let settings = session_settings(&config, BuildMode::Release)?;
/// assert!(settings.cookie_secure);
///
/// std::fs::remove_file(&key_path)?;
/// # Ok(())
/// # }
/// ```
pub fn session_settings(
    config: &AppSettings,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let allow_ephemeral = mode == BuildMode::Debug || config.session_allow_ephemeral;
    let key = load_key(&config.session_key_file(), mode, allow_ephemeral)?;
    let cookie_secure = config.session_cookie_secure();
    if !cookie_secure && mode == BuildMode::Release {
        warn!("session cookies are not marked Secure");
    }
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site: SameSite::Lax,
    })
}

fn load_key(path: &Path, mode: BuildMode, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
    let mut bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(error) if allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key; sessions will not survive a restart"
            );
            return Ok(Key::generate());
        }
        Err(error) => {
            return Err(SessionConfigError::KeyRead {
                path: path.to_path_buf(),
                source: error,
            });
        }
    };

    let length = bytes.len();
    let min_len = match mode {
        BuildMode::Release => SESSION_KEY_MIN_LEN,
        BuildMode::Debug => DERIVE_MIN_LEN,
    };
    if length < min_len {
        bytes.zeroize();
        if mode == BuildMode::Debug {
            warn!(path = %path.display(), length, "session key too short; using temporary key");
            return Ok(Key::generate());
        }
        return Err(SessionConfigError::KeyTooShort {
            path: path.to_path_buf(),
            length,
            min_len,
        });
    }
    let key = Key::derive_from(&bytes);
    bytes.zeroize();
    Ok(key)
}
