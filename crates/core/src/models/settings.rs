use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default lifetime of a cached price series: one hour.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Runtime settings of the simulator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Optional API keys for providers that require them.
    /// Keys: provider name (e.g., "alphavantage").
    /// Values: the API key string.
    #[serde(default)]
    pub api_keys: HashMap<String, String>,

    /// How long a fetched price series stays valid, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_keys: HashMap::new(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}
