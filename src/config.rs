use std::env;
use std::time::Duration;

use log::LevelFilter;

const MAX_DELAY_MS: u64 = 10_000;

/// Runtime knobs, read once from the environment at start-up.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Fixed seed for stat synthesis; `None` draws from OS entropy.
    pub rng_seed: Option<u64>,
    pub players_delay: Duration,
    pub chart_delay: Duration,
    pub tick_rate: Duration,
    pub log_level: LevelFilter,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            rng_seed: None,
            players_delay: Duration::from_millis(600),
            chart_delay: Duration::from_millis(800),
            tick_rate: Duration::from_millis(250),
            log_level: LevelFilter::Info,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Malformed or blank values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key).and_then(|val| {
                let trimmed = val.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
        };
        let millis = |key: &str| get(key).and_then(|val| val.parse::<u64>().ok());

        let defaults = Self::default();
        Self {
            rng_seed: get("SIXN_RNG_SEED").and_then(|val| val.parse::<u64>().ok()),
            players_delay: millis("SIXN_PLAYERS_DELAY_MS")
                .map(|ms| Duration::from_millis(ms.min(MAX_DELAY_MS)))
                .unwrap_or(defaults.players_delay),
            chart_delay: millis("SIXN_CHART_DELAY_MS")
                .map(|ms| Duration::from_millis(ms.min(MAX_DELAY_MS)))
                .unwrap_or(defaults.chart_delay),
            tick_rate: millis("SIXN_TICK_MS")
                .map(|ms| Duration::from_millis(ms.max(50)))
                .unwrap_or(defaults.tick_rate),
            log_level: get("SIXN_LOG_LEVEL")
                .and_then(|val| val.parse::<LevelFilter>().ok())
                .unwrap_or(defaults.log_level),
        }
    }
}
