use std::collections::HashMap;

use super::alphavantage::AlphaVantageProvider;
#[cfg(not(target_arch = "wasm32"))]
use super::yahoo_finance::YahooFinanceProvider;
use super::traits::PriceProvider;

/// Registry of all available price providers, in priority order.
///
/// The first provider is asked first; later ones are fallbacks.
/// New providers can be added without modifying existing code.
pub struct PriceProviderRegistry {
    providers: Vec<Box<dyn PriceProvider>>,
}

impl PriceProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with all default providers pre-configured.
    pub fn new_with_defaults(api_keys: &HashMap<String, String>) -> Self {
        let mut registry = Self::new();

        // Yahoo Finance: no API key needed (primary)
        // Not available on WASM (uses native reqwest/tokio connectors)
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Ok(yahoo) = YahooFinanceProvider::new() {
                registry.register(Box::new(yahoo));
            }
        }

        // Alpha Vantage: requires API key (fallback)
        if let Some(key) = api_keys.get("alphavantage") {
            registry.register(Box::new(AlphaVantageProvider::new(key.clone())));
        }

        registry
    }

    /// Register a new price provider at the lowest priority.
    pub fn register(&mut self, provider: Box<dyn PriceProvider>) {
        self.providers.push(provider);
    }

    /// All providers, ordered by registration priority.
    pub fn providers(&self) -> Vec<&dyn PriceProvider> {
        self.providers.iter().map(|p| p.as_ref()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }
}

impl Default for PriceProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
