//! Tracing/logging initialization.
//!
//! Configured through `RUST_LOG` (filter directives, default `info`) and
//! `AKBO_LOG_FORMAT` (`json`, `pretty` or `compact`; default `json`).

use std::convert::Infallible;
use std::str::FromStr;

use tracing_subscriber::EnvFilter;

/// Environment variable selecting the output format.
pub const FORMAT_ENV: &str = "AKBO_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
    Compact,
}

/// Unknown values fall back to JSON, so parsing never fails.
impl FromStr for LogFormat {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Self::Pretty,
            "compact" => Self::Compact,
            _ => Self::Json,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directives, e.g. `"info,akbo_core=debug"`.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let filter = lookup(EnvFilter::DEFAULT_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());
        let format = lookup(FORMAT_ENV)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        Self { filter, format }
    }
}

/// Install the global subscriber described by `config`.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init_with(config: &LogConfig) {
    let filter =
        EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    let _ = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_info_json() {
        let config = LogConfig::from_lookup(lookup(&[]));
        assert_eq!(config, LogConfig::default());
        assert_eq!(config.filter, "info");
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn reads_filter_and_format() {
        let config = LogConfig::from_lookup(lookup(&[
            ("RUST_LOG", "akbo_core=debug"),
            (FORMAT_ENV, "Pretty"),
        ]));
        assert_eq!(config.filter, "akbo_core=debug");
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn blank_filter_and_unknown_format_fall_back() {
        let config = LogConfig::from_lookup(lookup(&[("RUST_LOG", "  "), (FORMAT_ENV, "xml")]));
        assert_eq!(config, LogConfig::default());
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("json".parse(), Ok(LogFormat::Json));
        assert_eq!(" PRETTY ".parse(), Ok(LogFormat::Pretty));
        assert_eq!("Compact".parse(), Ok(LogFormat::Compact));
        assert_eq!("xml".parse(), Ok(LogFormat::Json));
    }

    #[test]
    fn init_is_idempotent() {
        init_with(&LogConfig::default());
        init_with(&LogConfig {
            filter: "not a [valid filter".to_string(),
            format: LogFormat::Compact,
        });
    }
}
