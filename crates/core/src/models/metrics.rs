use serde::{Deserialize, Serialize};

use super::category::DEFAULT_CATEGORY;

/// Outcome of putting `principal` dollars into a stock at the first close of
/// a price series and holding the same share count until the last close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentMetrics {
    /// Amount invested, in USD
    pub principal: f64,

    /// First closing price of the series
    pub start_price: f64,

    /// Last closing price of the series
    pub end_price: f64,

    /// Fractional shares bought: principal / start_price
    pub shares: f64,

    /// shares × end_price
    pub final_value: f64,

    /// final_value − principal
    pub profit_loss: f64,

    /// profit_loss / principal × 100
    pub profit_loss_pct: f64,

    /// Highest close in the series
    pub max_price: f64,

    /// Lowest close in the series
    pub min_price: f64,

    /// Holding value at the highest close (same share count)
    pub max_value: f64,

    /// Holding value at the lowest close (same share count)
    pub min_value: f64,

    /// Annualized standard deviation of daily returns, in percent
    pub volatility_pct: f64,

    /// Deepest decline from a running peak, in percent (≤ 0)
    pub max_drawdown_pct: f64,

    /// Annualized mean/stddev of daily returns, zero risk-free rate
    pub sharpe_ratio: f64,

    /// Reporting category, attached after computation
    pub category: String,
}

impl InvestmentMetrics {
    /// Return a copy tagged with `category`.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// `true` when the investment ended at or above its principal.
    pub fn is_gain(&self) -> bool {
        self.profit_loss >= 0.0
    }

    pub(crate) fn default_category() -> String {
        DEFAULT_CATEGORY.to_string()
    }
}
