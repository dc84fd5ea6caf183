use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::date_range::DateRange;
use crate::models::price::PricePoint;
use crate::models::stock::StockInfo;

/// Trait abstraction for all market-data providers.
///
/// Each API provider (Yahoo Finance, Alpha Vantage) implements this trait.
/// If an API stops working or changes, we replace only that one
/// implementation and the rest of the codebase is untouched.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Daily closing prices for `symbol` with dates inside `[start, end)`.
    /// An empty Vec means the provider has no data for that window
    /// (delisted symbol, no trading days, ...).
    async fn get_price_series(
        &self,
        symbol: &str,
        range: &DateRange,
    ) -> Result<Vec<PricePoint>, CoreError>;

    /// Check that `symbol` is tradable. Returns a display name when it is,
    /// `None` when the provider does not know the symbol.
    async fn validate_symbol(&self, symbol: &str) -> Result<Option<String>, CoreError>;

    /// Company metadata. Providers without a metadata endpoint return the
    /// fallback record.
    async fn get_stock_info(&self, symbol: &str) -> Result<StockInfo, CoreError> {
        Ok(StockInfo::fallback(symbol))
    }
}
