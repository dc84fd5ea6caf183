use std::collections::{BTreeSet, HashMap};

use super::config::UserConfig;
use super::stock::{default_stocks, StockEntry};

/// Category used for any symbol the registry does not know.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Categories offered out of the box. Users may add any other string.
pub const PREDEFINED_CATEGORIES: [&str; 15] = [
    "Technology",
    "Fintech",
    "Crypto",
    "ETFs",
    "Automotive",
    "Healthcare",
    "Consumer",
    "Entertainment",
    "E-commerce",
    "Industrial",
    "Real Estate",
    "Energy",
    "Indices",
    "Commodities",
    "ESG/Sustainable",
];

pub fn is_predefined(category: &str) -> bool {
    PREDEFINED_CATEGORIES.contains(&category)
}

/// Symbol → category lookup.
///
/// Categories are plain strings with no closed set; anything not
/// registered resolves to [`DEFAULT_CATEGORY`].
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    by_symbol: HashMap<String, String>,
    custom_categories: BTreeSet<String>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry over the built-in stocks plus the user's custom stocks.
    /// Custom entries win when a symbol appears in both.
    pub fn from_config(config: &UserConfig) -> Self {
        let mut registry = Self::new();
        for stock in default_stocks() {
            registry.register(&stock.symbol, &stock.category);
        }
        for (symbol, stock) in &config.custom_stocks {
            registry.register(symbol, &stock.category);
        }
        registry
            .custom_categories
            .extend(config.custom_categories.iter().cloned());
        registry
    }

    /// Map `symbol` to `category`, replacing any earlier mapping.
    pub fn register(&mut self, symbol: &str, category: &str) {
        let category = category.trim();
        if !is_predefined(category) && category != DEFAULT_CATEGORY {
            self.custom_categories.insert(category.to_string());
        }
        self.by_symbol
            .insert(symbol.trim().to_uppercase(), category.to_string());
    }

    /// Category of `symbol`, or [`DEFAULT_CATEGORY`] when unregistered.
    pub fn category_for(&self, symbol: &str) -> &str {
        self.by_symbol
            .get(&symbol.trim().to_uppercase())
            .map(String::as_str)
            .unwrap_or(DEFAULT_CATEGORY)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.by_symbol.contains_key(&symbol.trim().to_uppercase())
    }

    /// Sorted union of predefined and custom categories.
    pub fn all_categories(&self) -> Vec<String> {
        let mut all: BTreeSet<String> = PREDEFINED_CATEGORIES
            .iter()
            .map(|c| c.to_string())
            .collect();
        all.extend(self.custom_categories.iter().cloned());
        all.into_iter().collect()
    }
}

/// Sorted, distinct categories used by `stocks`.
pub fn categories_in_use(stocks: &[StockEntry]) -> Vec<String> {
    stocks
        .iter()
        .map(|s| s.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
