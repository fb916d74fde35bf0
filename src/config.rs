use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::projection::DEFAULT_MOMENTUM_COUNT;
use crate::scoring::MatchFormat;

const DEFAULT_INTERVAL_MS: u64 = 2000;
const MIN_INTERVAL_MS: u64 = 250;
const MAX_MOMENTUM_COUNT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub enabled: bool,
    pub interval: Duration,
    /// Overrides the catalog's format for simulated matches.
    pub format_override: Option<MatchFormat>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub sim: SimConfig,
    pub momentum_count: usize,
    pub log_file: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(opt_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let enabled = lookup("TENNIS_SIM_ENABLED")
            .and_then(|val| parse_flag(&val))
            .unwrap_or(true);
        let interval_ms = lookup("TENNIS_SIM_INTERVAL_MS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_INTERVAL_MS)
            .max(MIN_INTERVAL_MS);
        let format_override = lookup("TENNIS_BEST_OF")
            .and_then(|val| val.trim().parse::<u8>().ok())
            .and_then(MatchFormat::from_best_of);
        let momentum_count = lookup("TENNIS_MOMENTUM_COUNT")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_MOMENTUM_COUNT)
            .clamp(1, MAX_MOMENTUM_COUNT);

        Self {
            sim: SimConfig {
                enabled,
                interval: Duration::from_millis(interval_ms),
                format_override,
            },
            momentum_count,
            log_file: lookup("TENNIS_LOG_FILE").map(PathBuf::from),
            log_filter: lookup("TENNIS_LOG").unwrap_or_else(|| "info".to_string()),
        }
    }
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .and_then(|val| if val.trim().is_empty() { None } else { Some(val) })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
