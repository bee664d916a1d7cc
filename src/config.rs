use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Settings required to run the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Secret used to sign and verify access tokens.
    pub secret: String,
    pub token_ttl_hours: i64,
    /// Directory where uploaded attachments are written.
    pub upload_dir: PathBuf,
    /// Sender address for outbound quote emails.
    pub mail_from: String,
    pub cookie_secure: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
    #[error("{name} has an invalid value `{value}`")]
    Invalid { name: &'static str, value: String },
}

impl ServerConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = env::var("SECRET_KEY").map_err(|_| ConfigError::Missing("SECRET_KEY"))?;

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or("app.db".to_string()),
            address: env::var("ADDRESS").unwrap_or("127.0.0.1".to_string()),
            port: parse_var("PORT", 8080)?,
            secret,
            token_ttl_hours: parse_var("TOKEN_TTL_HOURS", 24 * 7)?,
            upload_dir: PathBuf::from(env::var("UPLOAD_DIR").unwrap_or("uploads".to_string())),
            mail_from: env::var("MAIL_FROM").unwrap_or("sales@localhost".to_string()),
            cookie_secure: parse_var("COOKIE_SECURE", false)?,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
