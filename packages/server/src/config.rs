use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Serialize;

/// Log verbosity accepted in `LOG_LEVEL`.
///
/// Seven named levels, each mapped onto a `tracing` level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Http,
    Verbose,
    Debug,
    Silly,
}

impl LogLevel {
    pub const ALL: [LogLevel; 7] = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Http,
        LogLevel::Verbose,
        LogLevel::Debug,
        LogLevel::Silly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Http => "http",
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
            LogLevel::Silly => "silly",
        }
    }

    /// `EnvFilter` directive for this level.
    pub fn filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info | LogLevel::Http => "info",
            LogLevel::Verbose | LogLevel::Debug => "debug",
            LogLevel::Silly => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        LogLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == needle)
            .ok_or_else(|| {
                format!(
                    "invalid log level '{}', expected one of: {}",
                    s,
                    LogLevel::ALL.map(|l| l.as_str()).join(", ")
                )
            })
    }
}

pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Debug;
pub const DEFAULT_PORT: u16 = 3333;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_MAX_CONCURRENT_SCRAPES: usize = 10;
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 30;

/// A required setting that is missing or invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigIssue {
    pub setting: String,
    pub problem: String,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Model credential. The server starts without it but is not ready.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub log_level: LogLevel,
    /// Raw `LOG_LEVEL` value, kept so readiness can report a bad setting.
    pub log_level_raw: Option<String>,
    pub fetch_timeout: Duration,
    pub model_timeout: Duration,
    pub max_concurrent_scrapes: usize,
    pub shutdown_grace: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: gemini_client::DEFAULT_BASE_URL.to_string(),
            log_level: DEFAULT_LOG_LEVEL,
            log_level_raw: None,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            model_timeout: Duration::from_secs(DEFAULT_MODEL_TIMEOUT_SECS),
            max_concurrent_scrapes: DEFAULT_MAX_CONCURRENT_SCRAPES,
            shutdown_grace: Duration::from_secs(DEFAULT_SHUTDOWN_GRACE_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level_raw = lookup("LOG_LEVEL");
        let log_level = log_level_raw
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_LOG_LEVEL);

        Ok(Self {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            gemini_api_key: lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()),
            gemini_model: lookup("GEMINI_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: lookup("GEMINI_BASE_URL")
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| gemini_client::DEFAULT_BASE_URL.to_string()),
            log_level,
            log_level_raw,
            fetch_timeout: Duration::from_secs(parse_or(
                &lookup,
                "FETCH_TIMEOUT_SECS",
                DEFAULT_FETCH_TIMEOUT_SECS,
            )?),
            model_timeout: Duration::from_secs(parse_or(
                &lookup,
                "MODEL_TIMEOUT_SECS",
                DEFAULT_MODEL_TIMEOUT_SECS,
            )?),
            max_concurrent_scrapes: parse_or(
                &lookup,
                "MAX_CONCURRENT_SCRAPES",
                DEFAULT_MAX_CONCURRENT_SCRAPES,
            )?
            .max(1),
            shutdown_grace: Duration::from_secs(parse_or(
                &lookup,
                "SHUTDOWN_GRACE_SECS",
                DEFAULT_SHUTDOWN_GRACE_SECS,
            )?),
        })
    }

    /// Required settings that are missing or invalid. Empty means ready.
    pub fn readiness_issues(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.gemini_api_key.is_none() {
            issues.push(ConfigIssue {
                setting: "GEMINI_API_KEY".to_string(),
                problem: "must be set to a non-empty value".to_string(),
            });
        }

        match self.log_level_raw.as_deref() {
            None => issues.push(ConfigIssue {
                setting: "LOG_LEVEL".to_string(),
                problem: "must be set".to_string(),
            }),
            Some(raw) => {
                if let Err(problem) = raw.parse::<LogLevel>() {
                    issues.push(ConfigIssue {
                        setting: "LOG_LEVEL".to_string(),
                        problem,
                    });
                }
            }
        }

        issues
    }

    /// Tracing filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> String {
        format!(
            "info,menu_scraper={level},gemini_client={level}",
            level = self.log_level.filter_directive()
        )
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", name)),
        _ => Ok(default),
    }
}
