use serde::Deserialize;

use crate::types::RateMode;

/// Root application configuration. Loaded from environment variables
/// with the prefix `ADBOARD__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Seconds a cached snapshot stays fresh before `get` refetches.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Hard bound on records kept per snapshot; rows past it are dropped.
    #[serde(default = "default_max_records")]
    pub max_records: usize,
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    /// Rate averaging used by the period aggregators. `weighted` recomputes
    /// rates from summed numerators and denominators; `record_mean`
    /// reproduces the upstream dashboard's mean of per-record rates.
    #[serde(default)]
    pub rate_mode: RateMode,
}

// Default functions
fn default_cache_ttl_secs() -> u64 {
    300
}
fn default_max_records() -> usize {
    25_000
}
fn default_fetch_timeout_ms() -> u64 {
    10_000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
            max_records: default_max_records(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            rate_mode: RateMode::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            analytics: AnalyticsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("ADBOARD")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_upstream_page_bound() {
        let config = AppConfig::default();
        assert_eq!(config.store.max_records, 25_000);
        assert_eq!(config.store.cache_ttl_secs, 300);
        assert_eq!(config.analytics.rate_mode, RateMode::Weighted);
    }
}
