use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::config::UserConfig;
use super::stock::{default_stocks, StockEntry};

/// The user's working state: customizations plus the amount currently
/// entered for each symbol.
///
/// Owned by the caller and passed explicitly to the services; nothing in
/// the library keeps hidden session state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Portfolio {
    /// Custom stocks, categories, presets and removed defaults
    pub config: UserConfig,

    /// Symbol → amount in USD (0 means "not invested")
    #[serde(default)]
    pub investments: HashMap<String, f64>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: UserConfig) -> Self {
        Self {
            config,
            investments: HashMap::new(),
        }
    }

    /// Built-in stocks that were not removed (in default order),
    /// followed by custom stocks (sorted by symbol).
    pub fn stock_universe(&self) -> Vec<StockEntry> {
        let mut stocks: Vec<StockEntry> = default_stocks()
            .into_iter()
            .filter(|s| !self.config.removed_default_stocks.contains(&s.symbol))
            .filter(|s| !self.config.custom_stocks.contains_key(&s.symbol))
            .collect();
        stocks.extend(
            self.config
                .custom_stocks
                .iter()
                .map(|(symbol, c)| StockEntry::new(symbol.as_str(), c.name.as_str(), c.category.as_str())),
        );
        stocks
    }

    /// Universe restricted to one category.
    pub fn stocks_in_category(&self, category: &str) -> Vec<StockEntry> {
        self.stock_universe()
            .into_iter()
            .filter(|s| s.category == category)
            .collect()
    }

    /// Amount entered for `symbol` (0 if none).
    pub fn amount_for(&self, symbol: &str) -> f64 {
        self.investments
            .get(&symbol.to_uppercase())
            .copied()
            .unwrap_or(0.0)
    }

    /// `(symbol, amount)` for every universe stock with an amount above 0,
    /// in universe order.
    pub fn active_investments(&self) -> Vec<(String, f64)> {
        self.stock_universe()
            .into_iter()
            .filter_map(|s| {
                let amount = self.amount_for(&s.symbol);
                (amount > 0.0).then_some((s.symbol, amount))
            })
            .collect()
    }

    /// Sum of all active amounts.
    pub fn total_invested(&self) -> f64 {
        self.active_investments().iter().map(|(_, a)| a).sum()
    }

    pub fn active_count(&self) -> usize {
        self.active_investments().len()
    }
}
