//! Application configuration loaded from environment variables.

use planner::DEFAULT_MAX_IN_FLIGHT;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `DATABASE_URL`: PostgreSQL connection string (unset: in-memory store)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: `5`)
/// - `MAIL_FROM`: sender address for outgoing email
///   (default: `"noreply@trip-planner.local"`)
/// - `NOTIFY_MAX_IN_FLIGHT`: concurrent notification sends (default: `16`)
/// - `SMTP_HOST`: mail relay host (unset: emails are not sent)
/// - `SMTP_PORT`: mail relay port (default: `1025`)
///
/// Numbers that fail to parse fall back to their defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub mail_from: String,
    pub notify_max_in_flight: usize,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
}

const DEFAULT_MAIL_FROM: &str = "noreply@trip-planner.local";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_SMTP_PORT: u16 = 1025;

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.database_max_connections),
            mail_from: lookup("MAIL_FROM").unwrap_or(defaults.mail_from),
            notify_max_in_flight: lookup("NOTIFY_MAX_IN_FLIGHT")
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.notify_max_in_flight),
            smtp_host: lookup("SMTP_HOST").filter(|host| !host.trim().is_empty()),
            smtp_port: lookup("SMTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.smtp_port),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            database_url: None,
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            mail_from: DEFAULT_MAIL_FROM.to_string(),
            notify_max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            smtp_host: None,
            smtp_port: DEFAULT_SMTP_PORT,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert!(config.database_url.is_none());
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.mail_from, "noreply@trip-planner.local");
        assert_eq!(config.notify_max_in_flight, 16);
        assert!(config.smtp_host.is_none());
        assert_eq!(config.smtp_port, 1025);
    }

    #[test]
    fn test_empty_lookup_matches_defaults() {
        let config = from_pairs(&[]);
        assert_eq!(config.addr(), "0.0.0.0:3000");
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("DATABASE_URL", "postgres://localhost/trips"),
            ("DATABASE_MAX_CONNECTIONS", "20"),
            ("MAIL_FROM", "trips@example.com"),
            ("NOTIFY_MAX_IN_FLIGHT", "4"),
            ("SMTP_HOST", "mailpit"),
            ("SMTP_PORT", "2525"),
        ]);
        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/trips")
        );
        assert_eq!(config.database_max_connections, 20);
        assert_eq!(config.mail_from, "trips@example.com");
        assert_eq!(config.notify_max_in_flight, 4);
        assert_eq!(config.smtp_host.as_deref(), Some("mailpit"));
        assert_eq!(config.smtp_port, 2525);
    }

    #[test]
    fn test_unparseable_numbers_fall_back() {
        let config = from_pairs(&[
            ("PORT", "eighty"),
            ("DATABASE_MAX_CONNECTIONS", "-1"),
            ("NOTIFY_MAX_IN_FLIGHT", "lots"),
            ("SMTP_PORT", "70000"),
        ]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.notify_max_in_flight, 16);
        assert_eq!(config.smtp_port, 1025);
    }

    #[test]
    fn test_blank_database_url_means_in_memory() {
        let config = from_pairs(&[("DATABASE_URL", "  ")]);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_blank_smtp_host_means_no_relay() {
        let config = from_pairs(&[("SMTP_HOST", ""), ("SMTP_PORT", "1025")]);
        assert!(config.smtp_host.is_none());
    }
}
