//! Application settings loaded via OrthoConfig.
//!
//! Values layer CLI flags over `TODOLIST_*` environment variables over an
//! optional configuration file. Every field is optional at load time; the
//! accessors apply defaults and validation so a bad value is reported once,
//! at startup, with the offending key.

use std::net::SocketAddr;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use rand::RngCore;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroizing;

use crate::outbound::security::{BCRYPT_MAX_COST, BCRYPT_MIN_COST};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_MINUTES: i64 = 60;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const MIN_SIGNING_KEY_LEN: usize = 32;
const EPHEMERAL_KEY_LEN: usize = 64;

/// Build mode for settings validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing signing key.
    Debug,
    /// Release builds require every secret explicitly.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Errors raised while validating settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// A required value is missing.
    #[error("missing required setting: {name}")]
    Missing { name: &'static str },
    /// A value is present but unusable.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Process-wide configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TODOLIST")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. Absent means in-memory storage.
    pub database_url: Option<String>,
    /// Secret used to sign session tokens.
    pub jwt_signing_key: Option<String>,
    /// Session token lifetime in minutes.
    pub jwt_session_minutes: Option<i64>,
    /// Domain attribute for the session cookie.
    pub cookie_domain: Option<String>,
    /// Whether the session cookie is marked `Secure`.
    pub cookie_secure: Option<bool>,
    /// bcrypt work factor.
    pub bcrypt_cost: Option<u32>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.trim().parse().map_err(|_| SettingsError::Invalid {
            name: "bind_addr",
            value: raw.to_owned(),
            expected: "host:port socket address",
        })
    }

    /// Database URL, if persistence is configured. Blank counts as unset.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn session_lifetime(&self) -> Result<TimeDelta, SettingsError> {
        let minutes = self.jwt_session_minutes.unwrap_or(DEFAULT_SESSION_MINUTES);
        if !(1..=i64::from(u16::MAX)).contains(&minutes) {
            return Err(SettingsError::Invalid {
                name: "jwt_session_minutes",
                value: minutes.to_string(),
                expected: "a positive number of minutes",
            });
        }
        Ok(TimeDelta::minutes(minutes))
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    pub fn cookie_domain(&self) -> Option<String> {
        self.cookie_domain.clone()
    }

    pub fn bcrypt_cost(&self) -> Result<u32, SettingsError> {
        let cost = self.bcrypt_cost.unwrap_or(bcrypt::DEFAULT_COST);
        if !(BCRYPT_MIN_COST..=BCRYPT_MAX_COST).contains(&cost) {
            return Err(SettingsError::Invalid {
                name: "bcrypt_cost",
                value: cost.to_string(),
                expected: "an integer between 4 and 31",
            });
        }
        Ok(cost)
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
            .max(1)
    }

    /// Token signing secret.
    ///
    /// Debug builds without a configured key get a random one, so sessions do
    /// not survive a restart. Release builds require a key of at least 32
    /// bytes.
    pub fn signing_key(&self, mode: BuildMode) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
        match self.jwt_signing_key.as_deref() {
            Some(key) if key.len() >= MIN_SIGNING_KEY_LEN => {
                Ok(Zeroizing::new(key.as_bytes().to_vec()))
            }
            Some(key) if mode == BuildMode::Release => Err(SettingsError::Invalid {
                name: "jwt_signing_key",
                value: format!("<{} bytes>", key.len()),
                expected: "at least 32 bytes",
            }),
            Some(key) => {
                warn!(length = key.len(), "short jwt signing key accepted in debug build");
                Ok(Zeroizing::new(key.as_bytes().to_vec()))
            }
            None if mode == BuildMode::Release => Err(SettingsError::Missing {
                name: "jwt_signing_key",
            }),
            None => {
                warn!("jwt signing key not set; using an ephemeral key (dev only)");
                let mut key = Zeroizing::new(vec![0_u8; EPHEMERAL_KEY_LEN]);
                rand::thread_rng().fill_bytes(key.as_mut_slice());
                Ok(key)
            }
        }
    }
}
