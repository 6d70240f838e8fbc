//! Configuration model loaded from external sources.

use std::time::Duration;

use serde::Deserialize;

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_page_size() -> usize {
    20
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across the data layer.
pub struct AppConfig {
    /// Lifetime of read-through cache entries, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Page size used by paginated listings.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
            page_size: default_page_size(),
        }
    }
}

impl AppConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Loads configuration from an optional YAML file, with
    /// `RETAINER_`-prefixed environment variables taking precedence.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }
        builder
            .add_source(config::Environment::with_prefix("RETAINER"))
            .build()?
            .try_deserialize()
    }
}
