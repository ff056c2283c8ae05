//! Configuration management for Auth Service
//!
//! Loads settings from environment variables, and from a `.env` file in
//! debug builds.

use anyhow::{bail, Context, Result};
use crypto_core::SessionKey;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub session_key: SessionKey,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        if cfg!(debug_assertions) {
            dotenvy::dotenv().ok();
        }

        Ok(Self {
            app: AppConfig::from_env()?,
            session_key: session_key_from_env()?,
        })
    }
}

impl AppConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: env::var("AUTH_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("AUTH_SERVICE_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid AUTH_SERVICE_PORT")?,
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

/// The secret shared with every service that issues session tokens.
///
/// Used byte for byte: every verifying party must hold the same key.
fn session_key_from_env() -> Result<SessionKey> {
    let secret = env::var("SESSION_SECRET").context("SESSION_SECRET must be set")?;
    if secret.trim().is_empty() {
        bail!("SESSION_SECRET must not be blank");
    }
    SessionKey::from_secret(secret.as_bytes()).context("Invalid SESSION_SECRET")
}
