use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::date_range::DateRange;
use crate::models::price::{PriceCache, PriceSeries, StockInfoCache};
use crate::models::stock::StockInfo;
use crate::providers::registry::PriceProviderRegistry;

/// Fetches price series and company metadata from API providers, with a
/// time-bounded cache in front.
///
/// Cache strategy:
/// - Entries are keyed by `(symbol, start, end)`.
/// - An entry is reused until it is older than the cache TTL, then refetched.
/// - "No data" answers are not cached, so a retry may find data later.
pub struct PriceService {
    registry: PriceProviderRegistry,
}

impl PriceService {
    pub fn new(registry: PriceProviderRegistry) -> Self {
        Self { registry }
    }

    /// Names of the registered providers, in priority order.
    pub fn get_provider_names(&self) -> Vec<String> {
        self.registry
            .providers()
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    pub fn has_provider(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Get the closing-price series of `symbol` over `range`.
    ///
    /// 1. Fresh cache entry → return it.
    /// 2. Otherwise ask each provider in order. The first non-empty answer is
    ///    validated, cached and returned. An empty answer means "no data".
    /// 3. If a provider fails, try the next one; if every provider failed,
    ///    return the last error.
    ///
    /// `Ok(None)` is the soft "no data for this symbol" outcome.
    pub async fn fetch_series(
        &self,
        cache: &mut PriceCache,
        symbol: &str,
        range: &DateRange,
        now: DateTime<Utc>,
    ) -> Result<Option<PriceSeries>, CoreError> {
        if let Some(series) = cache.get(symbol, range, now) {
            debug!(symbol, %range, "price series served from cache");
            return Ok(Some(series.clone()));
        }

        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut last_error = None;
        let mut any_answered = false;

        for provider in &providers {
            match provider.get_price_series(symbol, range).await {
                Ok(points) if points.is_empty() => {
                    debug!(symbol, provider = provider.name(), "provider has no data");
                    any_answered = true;
                }
                Ok(points) => match PriceSeries::from_unsorted(points) {
                    Ok(series) => {
                        cache.insert(symbol, range, series.clone(), now);
                        return Ok(Some(series));
                    }
                    Err(e) => {
                        warn!(symbol, provider = provider.name(), error = %e, "provider returned invalid prices");
                        last_error = Some(CoreError::Api {
                            provider: provider.name().to_string(),
                            message: format!("Invalid price data for {symbol}: {e}"),
                        });
                    }
                },
                Err(e) => {
                    warn!(symbol, provider = provider.name(), error = %e, "provider failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        if any_answered {
            return Ok(None);
        }
        Err(last_error.unwrap_or(CoreError::NoProvider))
    }

    /// Ask the providers whether `symbol` exists. Returns its display name.
    /// A provider error falls through to the next provider; `None` if nobody
    /// recognizes the symbol.
    pub async fn validate_symbol(&self, symbol: &str) -> Result<Option<String>, CoreError> {
        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut last_error = None;
        let mut any_answered = false;
        for provider in &providers {
            match provider.validate_symbol(symbol).await {
                Ok(Some(name)) => return Ok(Some(name)),
                Ok(None) => any_answered = true,
                Err(e) => {
                    warn!(symbol, provider = provider.name(), error = %e, "symbol validation failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if !any_answered => Err(e),
            _ => Ok(None),
        }
    }

    /// Company metadata, never failing: a fresh cache entry wins, then the
    /// first provider that knows more than the placeholder, otherwise the
    /// placeholder. Whatever is returned is cached, placeholder included.
    pub async fn get_stock_info(
        &self,
        cache: &mut StockInfoCache,
        symbol: &str,
        now: DateTime<Utc>,
    ) -> StockInfo {
        if let Some(info) = cache.get(symbol, now) {
            debug!(symbol, "stock info served from cache");
            return info.clone();
        }

        let fallback = StockInfo::fallback(symbol);
        let mut found = None;
        for provider in self.registry.providers() {
            match provider.get_stock_info(symbol).await {
                Ok(info) if info != fallback => {
                    found = Some(info);
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(symbol, provider = provider.name(), error = %e, "no stock info from provider");
                }
            }
        }

        let info = found.unwrap_or(fallback);
        cache.insert(symbol, info.clone(), now);
        info
    }
}
