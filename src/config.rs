//! Application configuration management.
//!
//! Configuration is read once at startup from environment variables using
//! the `envy` crate and then shared read-only with every request.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `ADMIN_SECRETS` (optional): comma-separated admin shared secrets
/// - `DB_TIMEOUT_SECS` (optional): per-query store timeout, defaults to 5
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    /// Raw comma-separated list. Use [`Config::admin_secrets`] for the parsed form.
    #[serde(default)]
    pub admin_secrets: String,

    #[serde(default = "default_db_timeout")]
    pub db_timeout_secs: u64,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_db_timeout() -> u64 {
    5
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is loaded first if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a numeric variable
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        // database_url -> DATABASE_URL, admin_secrets -> ADMIN_SECRETS, ...
        envy::from_env::<Config>()
    }

    /// Admin secrets split on commas, trimmed, with empty entries dropped.
    ///
    /// Dropping empties matters: `"a,,b"` or a trailing comma must never turn
    /// the empty string into a valid credential.
    pub fn admin_secrets(&self) -> Vec<String> {
        parse_secret_list(&self.admin_secrets)
    }

    pub fn db_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.db_timeout_secs.max(1))
    }
}

pub fn parse_secret_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
