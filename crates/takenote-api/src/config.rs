//! Server settings read from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `APP_NAME` | `Take Note Backend API` |
//! | `APP_VERSION` | crate version |
//! | `DEBUG` | `true` |
//! | `HOST` / `PORT` | `0.0.0.0` / `8000` |
//! | `SUPABASE_URL` / `SUPABASE_KEY` | required unless `DEBUG` |
//! | `RATE_LIMIT_ENABLED` | `true` |
//! | `RATE_LIMIT_REQUESTS` / `RATE_LIMIT_PERIOD_SECS` | `100` / `60` |
//! | `ALLOWED_ORIGINS` | comma-separated; any origin in debug when unset |
//! | `MAX_BODY_SIZE_BYTES` | 10 MB |
//! | `AI_ENABLED` | `true` |
//! | `AI_TIMEOUT_SECS` | `30` |

use axum::http::HeaderValue;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use takenote_core::defaults;
use takenote_core::{Error, Result};

const DEFAULT_APP_NAME: &str = "Take Note Backend API";

#[derive(Clone)]
pub struct Settings {
    pub app_name: String,
    pub app_version: String,
    pub debug: bool,
    pub host: String,
    pub port: u16,
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub rate_limit_enabled: bool,
    pub rate_limit_requests: u32,
    pub rate_limit_period_secs: u64,
    pub allowed_origins: Vec<String>,
    pub max_body_size: usize,
    pub ai_enabled: bool,
    pub ai_timeout_secs: u64,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("app_name", &self.app_name)
            .field("app_version", &self.app_version)
            .field("debug", &self.debug)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("supabase_url", &self.supabase_url)
            .field("supabase_key", &self.supabase_key.as_ref().map(|_| "<redacted>"))
            .field("rate_limit_enabled", &self.rate_limit_enabled)
            .field("rate_limit_requests", &self.rate_limit_requests)
            .field("rate_limit_period_secs", &self.rate_limit_period_secs)
            .field("allowed_origins", &self.allowed_origins)
            .field("max_body_size", &self.max_body_size)
            .field("ai_enabled", &self.ai_enabled)
            .field("ai_timeout_secs", &self.ai_timeout_secs)
            .finish()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings from a fixed variable table.
    pub fn from_map(vars: &HashMap<&str, &str>) -> Self {
        Self::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let text = |key: &str| var(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let flag = |key: &str, default: bool| {
            text(key)
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(default)
        };

        Self {
            app_name: text("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            app_version: text("APP_VERSION")
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            debug: flag("DEBUG", true),
            host: text("HOST").unwrap_or_else(|| defaults::SERVER_HOST.to_string()),
            port: parsed(text("PORT"), defaults::SERVER_PORT),
            supabase_url: text("SUPABASE_URL"),
            supabase_key: text("SUPABASE_KEY"),
            rate_limit_enabled: flag("RATE_LIMIT_ENABLED", true),
            rate_limit_requests: parsed(text("RATE_LIMIT_REQUESTS"), defaults::RATE_LIMIT_REQUESTS),
            rate_limit_period_secs: parsed(
                text("RATE_LIMIT_PERIOD_SECS"),
                defaults::RATE_LIMIT_PERIOD_SECS,
            ),
            allowed_origins: text("ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            max_body_size: parsed(text("MAX_BODY_SIZE_BYTES"), defaults::MAX_BODY_SIZE_BYTES),
            ai_enabled: flag("AI_ENABLED", true),
            ai_timeout_secs: parsed(text("AI_TIMEOUT_SECS"), defaults::AI_TIMEOUT_SECS),
        }
    }

    /// Check that the settings describe a runnable server.
    ///
    /// Missing Supabase settings are an error only outside debug mode; in
    /// debug mode they are returned as warnings for the caller to log.
    pub fn validate(&self) -> Result<Vec<String>> {
        if self.rate_limit_enabled && (self.rate_limit_requests == 0 || self.rate_limit_period_secs == 0) {
            return Err(Error::Config(
                "RATE_LIMIT_REQUESTS and RATE_LIMIT_PERIOD_SECS must be non-zero".to_string(),
            ));
        }
        if self.max_body_size == 0 {
            return Err(Error::Config("MAX_BODY_SIZE_BYTES must be non-zero".to_string()));
        }

        let missing = self.missing_platform_vars();
        if missing.is_empty() {
            return Ok(Vec::new());
        }
        let message = format!("Missing required environment variables: {}", missing.join(", "));
        if self.debug {
            Ok(vec![message])
        } else {
            Err(Error::Config(message))
        }
    }

    fn missing_platform_vars(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.supabase_url.is_none() {
            missing.push("SUPABASE_URL");
        }
        if self.supabase_key.is_none() {
            missing.push("SUPABASE_KEY");
        }
        missing
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn rate_limit_period(&self) -> Duration {
        Duration::from_secs(self.rate_limit_period_secs)
    }

    pub fn ai_timeout(&self) -> Duration {
        Duration::from_secs(self.ai_timeout_secs)
    }

    /// Swagger UI path, exposed only in debug mode.
    pub fn docs_url(&self) -> Option<&'static str> {
        self.debug.then_some("/docs")
    }

    /// Configured CORS origins as header values. Invalid entries are skipped.
    pub fn cors_origins(&self) -> Vec<HeaderValue> {
        self.allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", origin, e);
                    None
                }
            })
            .collect()
    }
}

fn parsed<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.app_name, "Take Note Backend API");
        assert_eq!(settings.port, 8000);
        assert!(settings.debug);
        assert_eq!(settings.rate_limit_requests, 100);
        assert_eq!(settings.rate_limit_period(), Duration::from_secs(60));
        assert_eq!(settings.max_body_size, 10 * 1024 * 1024);
        assert!(settings.allowed_origins.is_empty());
        assert_eq!(settings.docs_url(), Some("/docs"));
    }

    #[test]
    fn test_reads_overrides() {
        let vars = HashMap::from([
            ("PORT", "9000"),
            ("DEBUG", "false"),
            ("RATE_LIMIT_REQUESTS", "5"),
            ("AI_ENABLED", "0"),
            ("SUPABASE_URL", "https://demo.supabase.co"),
            ("SUPABASE_KEY", "anon"),
        ]);
        let settings = Settings::from_map(&vars);
        assert_eq!(settings.port, 9000);
        assert!(!settings.debug);
        assert!(!settings.ai_enabled);
        assert_eq!(settings.rate_limit_requests, 5);
        assert_eq!(settings.docs_url(), None);
        assert_eq!(settings.bind_addr(), "0.0.0.0:9000");
    }

    #[test]
    fn test_unparseable_numbers_use_defaults() {
        let vars = HashMap::from([("PORT", "eighty"), ("AI_TIMEOUT_SECS", "-1")]);
        let settings = Settings::from_map(&vars);
        assert_eq!(settings.port, 8000);
        assert_eq!(settings.ai_timeout_secs, 30);
    }

    #[test]
    fn test_missing_supabase_warns_in_debug() {
        let warnings = Settings::default().validate().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("SUPABASE_URL"));
        assert!(warnings[0].contains("SUPABASE_KEY"));
    }

    #[test]
    fn test_missing_supabase_fails_in_production() {
        let vars = HashMap::from([("DEBUG", "false"), ("SUPABASE_URL", "https://x.supabase.co")]);
        let err = Settings::from_map(&vars).validate().unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("SUPABASE_KEY")));
    }

    #[test]
    fn test_zero_rate_limit_rejected() {
        let vars = HashMap::from([("RATE_LIMIT_REQUESTS", "0")]);
        assert!(Settings::from_map(&vars).validate().is_err());

        let vars = HashMap::from([("RATE_LIMIT_REQUESTS", "0"), ("RATE_LIMIT_ENABLED", "false")]);
        assert!(Settings::from_map(&vars).validate().is_ok());
    }

    #[test]
    fn test_cors_origins_parsing() {
        let vars = HashMap::from([(
            "ALLOWED_ORIGINS",
            "https://app.takenote.dev, http://localhost:3000 ,,bad\norigin",
        )]);
        let settings = Settings::from_map(&vars);
        let origins = settings.cors_origins();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "https://app.takenote.dev");
        assert_eq!(origins[1], "http://localhost:3000");
    }

    #[test]
    fn test_debug_redacts_key() {
        let vars = HashMap::from([("SUPABASE_KEY", "super-secret")]);
        let debug = format!("{:?}", Settings::from_map(&vars));
        assert!(!debug.contains("super-secret"));
    }
}
