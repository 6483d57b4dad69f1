//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SWEETSHOP_HOST` - Bind address (default: 127.0.0.1)
//! - `SWEETSHOP_PORT` - Listen port (default: 3000)
//! - `SWEETSHOP_DATABASE_URL` - `PostgreSQL` connection string; falls back
//!   to `DATABASE_URL`. When neither is set the server runs on the
//!   in-memory catalog (single-process deployments, demos, tests).
//! - `SWEETSHOP_ADMIN_TOKENS` - comma-separated `subject:token` entries
//!   granting the admin role
//! - `SWEETSHOP_USER_TOKENS` - comma-separated `subject:token` entries
//!   granting the user role
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// A bearer token granting a role to a named subject.
#[derive(Debug, Clone)]
pub struct TokenEntry {
    /// Who the token belongs to (used for logging only).
    pub subject: String,
    /// The bearer token value.
    pub token: SecretString,
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// `PostgreSQL` connection URL; `None` selects the in-memory catalog
    pub database_url: Option<SecretString>,
    /// Tokens resolving to the admin role
    pub admin_tokens: Vec<TokenEntry>,
    /// Tokens resolving to the user role
    pub user_tokens: Vec<TokenEntry>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("SWEETSHOP_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SWEETSHOP_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("SWEETSHOP_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SWEETSHOP_PORT".to_owned(), e.to_string()))?;

        let database_url = get_database_url();

        let admin_tokens = match get_optional_env("SWEETSHOP_ADMIN_TOKENS") {
            Some(raw) => parse_token_list("SWEETSHOP_ADMIN_TOKENS", &raw)?,
            None => Vec::new(),
        };
        let user_tokens = match get_optional_env("SWEETSHOP_USER_TOKENS") {
            Some(raw) => parse_token_list("SWEETSHOP_USER_TOKENS", &raw)?,
            None => Vec::new(),
        };

        Ok(Self {
            host,
            port,
            database_url,
            admin_tokens,
            user_tokens,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url() -> Option<SecretString> {
    std::env::var("SWEETSHOP_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a comma-separated list of `subject:token` entries.
fn parse_token_list(var_name: &str, raw: &str) -> Result<Vec<TokenEntry>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (subject, token) = entry.split_once(':').ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    var_name.to_owned(),
                    "expected comma-separated subject:token entries".to_owned(),
                )
            })?;
            if subject.is_empty() || token.is_empty() {
                return Err(ConfigError::InvalidEnvVar(
                    var_name.to_owned(),
                    "subject and token must be non-empty".to_owned(),
                ));
            }
            Ok(TokenEntry {
                subject: subject.to_owned(),
                token: SecretString::from(token),
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_parse_token_list_single() {
        let tokens = parse_token_list("TEST_VAR", "alice:s3cret").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens.first().unwrap().subject, "alice");
        assert_eq!(tokens.first().unwrap().token.expose_secret(), "s3cret");
    }

    #[test]
    fn test_parse_token_list_multiple_with_spaces() {
        let tokens = parse_token_list("TEST_VAR", "alice:one, bob:two").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens.get(1).unwrap().subject, "bob");
    }

    #[test]
    fn test_parse_token_list_rejects_missing_separator() {
        assert!(parse_token_list("TEST_VAR", "just-a-token").is_err());
    }

    #[test]
    fn test_parse_token_list_rejects_empty_parts() {
        assert!(parse_token_list("TEST_VAR", ":token").is_err());
        assert!(parse_token_list("TEST_VAR", "alice:").is_err());
    }

    #[test]
    fn test_parse_token_list_ignores_trailing_comma() {
        let tokens = parse_token_list("TEST_VAR", "alice:one,").unwrap();
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            database_url: None,
            admin_tokens: Vec::new(),
            user_tokens: Vec::new(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_token_entry_debug_redacts_secret() {
        let entry = TokenEntry {
            subject: "alice".to_owned(),
            token: SecretString::from("super_secret_value"),
        };
        let debug_output = format!("{entry:?}");
        assert!(debug_output.contains("alice"));
        assert!(!debug_output.contains("super_secret_value"));
    }
}
