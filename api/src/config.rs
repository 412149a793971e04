use std::env;

use anyhow::{Context, Result};

use crate::auth::hash_api_key;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// SHA-256 hex digest of the admin API key. Writes are refused when unset.
    pub admin_api_key_hash: Option<String>,
    /// Create missing tables on startup
    pub auto_migrate: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a port number, got '{}'", raw))?,
            None => 8080,
        };

        let auto_migrate = match lookup("AUTO_MIGRATE") {
            Some(raw) => parse_flag(&raw)
                .with_context(|| format!("AUTO_MIGRATE must be true or false, got '{}'", raw))?,
            None => true,
        };

        let admin_api_key_hash = lookup("ADMIN_API_KEY")
            .filter(|key| !key.is_empty())
            .map(|key| hash_api_key(&key));

        Ok(Self {
            database_url,
            port,
            admin_api_key_hash,
            auto_migrate,
        })
    }

    /// Check if admin writes are possible at all
    pub fn admin_enabled(&self) -> bool {
        self.admin_api_key_hash.is_some()
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
