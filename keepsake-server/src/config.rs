//! Configuration for the keepsake server
//!
//! CLI arguments and environment variable handling using clap. Values are read once at
//! process start; a `.env` file is loaded first when present.

use clap::{Parser, ValueEnum};
use std::{
    net::{IpAddr, SocketAddr},
    time::Duration,
};
use tracing::Level;

/// Keepsake - REST backend for shared photos, songs, movies, notes and plans
#[derive(Parser, Debug, Clone)]
#[command(name = "keepsake-server")]
#[command(about = "REST backend for shared photos, songs, movies, notes and plans")]
pub struct Args {
    /// MongoDB connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// MongoDB database name
    #[arg(long, env = "DATABASE_NAME")]
    pub database_name: Option<String>,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "8000")]
    pub port: u16,

    /// Refuse to start unless the store is configured and answers a ping
    #[arg(long, env = "REQUIRE_STORE", default_value = "false")]
    pub require_store: bool,

    /// Server selection and connect timeout for the store, in milliseconds
    #[arg(long, env = "STORE_TIMEOUT_MS", default_value = "3000")]
    pub store_timeout_ms: u64,

    /// Log level used when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

impl Args {
    /// The connection string, treating an empty value as unset.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }

    /// The database name, treating an empty value as unset.
    pub fn database_name(&self) -> Option<&str> {
        self.database_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }

    /// Socket address to listen on
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.store_timeout_ms == 0 {
            return Err("STORE_TIMEOUT_MS must be greater than zero".to_string());
        }

        if self.log_level.parse::<Level>().is_err() {
            return Err(format!(
                "LOG_LEVEL must be one of trace, debug, info, warn, error (got {:?})",
                self.log_level
            ));
        }

        if self.require_store && (self.database_url().is_none() || self.database_name().is_none()) {
            return Err(
                "REQUIRE_STORE is set but DATABASE_URL and DATABASE_NAME are not both configured"
                    .to_string(),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("keepsake-server").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_listen_addr_from_flags() {
        let args = parse(&["--host", "127.0.0.1", "--port", "9001"]);
        assert_eq!(args.listen_addr(), "127.0.0.1:9001".parse().unwrap());
    }

    #[test]
    fn test_empty_database_settings_count_as_unset() {
        let args = parse(&["--database-url", "", "--database-name", "  "]);
        assert!(args.database_url().is_none());
        assert!(args.database_name().is_none());
    }

    #[test]
    fn test_require_store_needs_database_settings() {
        let mut args = parse(&["--database-url", "mongodb://localhost:27017", "--database-name", "couples"]);
        args.require_store = true;
        assert!(args.validate().is_ok());

        args.database_name = None;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut args = parse(&[]);
        args.store_timeout_ms = 0;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let mut args = parse(&["--log-level", "WARN"]);
        assert!(args.validate().is_ok());

        args.log_level = "verbose".to_string();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_format_values() {
        assert_eq!(parse(&["--log-format", "json"]).log_format, LogFormat::Json);
    }
}
