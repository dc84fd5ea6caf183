pub mod errors;
pub mod format;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

use errors::CoreError;
use models::{
    category::{categories_in_use, CategoryRegistry},
    config::UserConfig,
    date_range::DateRange,
    metrics::InvestmentMetrics,
    portfolio::Portfolio,
    price::{PriceCache, StockInfoCache},
    report::PortfolioReport,
    settings::Settings,
    stock::{StockEntry, StockInfo},
};
use providers::registry::PriceProviderRegistry;
use services::{
    analytics_service::AnalyticsService, metrics_service::MetricsService,
    portfolio_service::PortfolioService, price_service::PriceService,
};
use storage::config_file::ConfigStore;

/// A symbol that was requested but left out of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingSymbol {
    pub symbol: String,
    pub reason: String,
}

/// Result of one "calculate" run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Window the prices were taken from
    pub range: DateRange,

    /// Totals, category roll-ups and rankings
    pub report: PortfolioReport,

    /// Company metadata per included symbol
    pub stock_infos: BTreeMap<String, StockInfo>,

    /// Symbols skipped because no price data could be obtained
    pub missing: Vec<MissingSymbol>,
}

/// Main entry point for the What-If Investor core library.
/// Holds the user's portfolio, settings, and all services needed to run a
/// simulation on it.
#[must_use]
pub struct InvestmentSimulator {
    portfolio: Portfolio,
    settings: Settings,
    price_cache: PriceCache,
    info_cache: StockInfoCache,
    portfolio_service: PortfolioService,
    price_service: PriceService,
    metrics_service: MetricsService,
    analytics_service: AnalyticsService,
    last_result: Option<SimulationResult>,
}

impl std::fmt::Debug for InvestmentSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvestmentSimulator")
            .field("active_investments", &self.portfolio.active_count())
            .field("cache_ttl_secs", &self.settings.cache_ttl_secs)
            .field("cached_series", &self.price_cache.len())
            .field("cached_infos", &self.info_cache.len())
            .field("has_result", &self.last_result.is_some())
            .finish()
    }
}

impl InvestmentSimulator {
    /// Create a simulator with the built-in stock universe and default settings.
    pub fn create_new() -> Self {
        Self::with_settings(Portfolio::default(), Settings::default())
    }

    /// Create a simulator from an existing portfolio and settings, using the
    /// default providers.
    pub fn with_settings(portfolio: Portfolio, settings: Settings) -> Self {
        let registry = PriceProviderRegistry::new_with_defaults(&settings.api_keys);
        Self::with_registry(portfolio, settings, registry)
    }

    /// Create a simulator that fetches prices from `registry`.
    pub fn with_registry(
        portfolio: Portfolio,
        settings: Settings,
        registry: PriceProviderRegistry,
    ) -> Self {
        Self {
            price_cache: PriceCache::new(settings.cache_ttl_secs),
            info_cache: StockInfoCache::new(settings.cache_ttl_secs),
            portfolio,
            settings,
            portfolio_service: PortfolioService::new(),
            price_service: PriceService::new(registry),
            metrics_service: MetricsService::new(),
            analytics_service: AnalyticsService::new(),
            last_result: None,
        }
    }

    // ── Simulation ──────────────────────────────────────────────────

    /// Simulate every active investment over `range`, using the current time
    /// for cache freshness.
    pub async fn calculate(&mut self, range: DateRange) -> Result<&SimulationResult, CoreError> {
        self.calculate_at(range, Utc::now()).await
    }

    /// Simulate every active investment over `range`.
    ///
    /// Symbols without price data are skipped and listed in
    /// `SimulationResult::missing`. Fails with `NoActiveInvestments` when no
    /// amount is above 0 and with `NoPriceData` when no symbol has data.
    /// On success the result replaces the previous one.
    pub async fn calculate_at(
        &mut self,
        range: DateRange,
        now: DateTime<Utc>,
    ) -> Result<&SimulationResult, CoreError> {
        let active = self.portfolio.active_investments();
        if active.is_empty() {
            return Err(CoreError::NoActiveInvestments);
        }

        info!(symbols = active.len(), %range, "starting investment simulation");

        let registry = CategoryRegistry::from_config(&self.portfolio.config);
        let mut results: Vec<(String, InvestmentMetrics)> = Vec::with_capacity(active.len());
        let mut stock_infos = BTreeMap::new();
        let mut missing = Vec::new();

        for (symbol, amount) in active {
            let series = match self
                .price_service
                .fetch_series(&mut self.price_cache, &symbol, &range, now)
                .await
            {
                Ok(Some(series)) => series,
                Ok(None) => {
                    warn!(symbol = %symbol, "no price data in range");
                    missing.push(MissingSymbol {
                        symbol,
                        reason: format!("No price data between {} and {}", range.start(), range.end()),
                    });
                    continue;
                }
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "price fetch failed");
                    missing.push(MissingSymbol {
                        symbol,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let metrics = self
                .metrics_service
                .compute_metrics(&series, amount)?
                .with_category(registry.category_for(&symbol));

            let info = self
                .price_service
                .get_stock_info(&mut self.info_cache, &symbol, now)
                .await;
            stock_infos.insert(symbol.clone(), info);
            results.push((symbol, metrics));
        }

        if results.is_empty() {
            return Err(CoreError::NoPriceData);
        }

        let report = self.analytics_service.aggregate(&results)?;

        info!(
            included = results.len(),
            missing = missing.len(),
            total_profit_loss = report.totals.total_profit_loss,
            "investment simulation completed"
        );

        Ok(&*self.last_result.insert(SimulationResult {
            range,
            report,
            stock_infos,
            missing,
        }))
    }

    /// The outcome of the most recent successful `calculate`.
    #[must_use]
    pub fn last_result(&self) -> Option<&SimulationResult> {
        self.last_result.as_ref()
    }

    // ── Stock Universe ──────────────────────────────────────────────

    /// All stocks currently offered (built-ins not removed, then custom ones).
    #[must_use]
    pub fn stock_universe(&self) -> Vec<StockEntry> {
        self.portfolio.stock_universe()
    }

    /// Stocks of one category.
    #[must_use]
    pub fn stocks_in_category(&self, category: &str) -> Vec<StockEntry> {
        self.portfolio.stocks_in_category(category)
    }

    /// Sorted categories used by the current universe.
    #[must_use]
    pub fn categories_in_use(&self) -> Vec<String> {
        categories_in_use(&self.portfolio.stock_universe())
    }

    /// Sorted predefined plus custom categories.
    #[must_use]
    pub fn all_categories(&self) -> Vec<String> {
        CategoryRegistry::from_config(&self.portfolio.config).all_categories()
    }

    /// Check `symbol` with the price providers, then add it as a custom stock.
    /// Returns the stored (uppercased) symbol.
    pub async fn add_validated_stock(
        &mut self,
        symbol: &str,
        category: &str,
    ) -> Result<String, CoreError> {
        let symbol = symbol.trim().to_uppercase();
        let name = self
            .price_service
            .validate_symbol(&symbol)
            .await?
            .ok_or_else(|| CoreError::ValidationError(format!("'{symbol}' is not a valid symbol")))?;
        self.portfolio_service
            .add_custom_stock(&mut self.portfolio, &symbol, &name, category)
    }

    /// Add a custom stock without contacting any provider.
    pub fn add_custom_stock(
        &mut self,
        symbol: &str,
        name: &str,
        category: &str,
    ) -> Result<String, CoreError> {
        self.portfolio_service
            .add_custom_stock(&mut self.portfolio, symbol, name, category)
    }

    pub fn remove_custom_stock(&mut self, symbol: &str) -> Result<(), CoreError> {
        self.portfolio_service
            .remove_custom_stock(&mut self.portfolio, symbol)
    }

    pub fn remove_default_stock(&mut self, symbol: &str) -> Result<(), CoreError> {
        self.portfolio_service
            .remove_default_stock(&mut self.portfolio, symbol)
    }

    pub fn restore_default_stock(&mut self, symbol: &str) -> bool {
        self.portfolio_service
            .restore_default_stock(&mut self.portfolio, symbol)
    }

    // ── Amounts ─────────────────────────────────────────────────────

    pub fn set_investment(&mut self, symbol: &str, amount: f64) -> Result<(), CoreError> {
        self.portfolio_service
            .set_investment(&mut self.portfolio, symbol, amount)
    }

    pub fn apply_amount_to_all(&mut self, amount: f64) -> Result<(), CoreError> {
        self.portfolio_service
            .apply_amount_to_all(&mut self.portfolio, amount)
    }

    pub fn reset_investments(&mut self) {
        self.portfolio_service.reset_investments(&mut self.portfolio);
    }

    pub fn apply_random_amounts(&mut self) -> Result<(), CoreError> {
        self.portfolio_service
            .apply_random_amounts(&mut self.portfolio)
    }

    /// `(symbol, amount)` of every stock with an amount above 0.
    #[must_use]
    pub fn active_investments(&self) -> Vec<(String, f64)> {
        self.portfolio.active_investments()
    }

    #[must_use]
    pub fn total_invested(&self) -> f64 {
        self.portfolio.total_invested()
    }

    // ── Presets ─────────────────────────────────────────────────────

    pub fn save_preset(&mut self, name: &str) -> Result<usize, CoreError> {
        self.portfolio_service.save_preset(&mut self.portfolio, name)
    }

    pub fn load_preset(&mut self, name: &str) -> Result<(), CoreError> {
        self.portfolio_service.load_preset(&mut self.portfolio, name)
    }

    pub fn delete_preset(&mut self, name: &str) -> Result<(), CoreError> {
        self.portfolio_service.delete_preset(&mut self.portfolio, name)
    }

    #[must_use]
    pub fn list_presets(&self) -> Vec<(String, usize)> {
        self.portfolio_service.list_presets(&self.portfolio)
    }

    /// Drop every customization, amount and the last result.
    pub fn clear_all(&mut self) {
        self.portfolio_service.clear_all(&mut self.portfolio);
        self.last_result = None;
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Export the user configuration as a JSON string.
    pub fn export_config_json(&self) -> Result<String, CoreError> {
        ConfigStore::export_to_json(&self.portfolio.config)
    }

    /// Replace the user configuration with one imported from JSON.
    /// Amounts are kept for symbols still in the universe.
    pub fn import_config_json(&mut self, json: &str) -> Result<(), CoreError> {
        let config = ConfigStore::import_from_json(json)?;
        self.portfolio.config = config;
        let universe: Vec<String> = self
            .portfolio
            .stock_universe()
            .into_iter()
            .map(|s| s.symbol)
            .collect();
        self.portfolio
            .investments
            .retain(|symbol, _| universe.contains(symbol));
        Ok(())
    }

    #[must_use]
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    #[must_use]
    pub fn config(&self) -> &UserConfig {
        &self.portfolio.config
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.settings
    }

    /// Change how long fetched series stay cached.
    pub fn set_cache_ttl_secs(&mut self, ttl_secs: u64) {
        self.settings.cache_ttl_secs = ttl_secs;
        self.price_cache.set_ttl_secs(ttl_secs);
        self.info_cache.set_ttl_secs(ttl_secs);
    }

    /// Set an API key for a provider (e.g., "alphavantage").
    /// Rebuilds the provider registry so the new key takes effect immediately.
    pub fn set_api_key(&mut self, provider: String, key: String) {
        self.settings.api_keys.insert(provider, key);
        self.rebuild_providers();
    }

    /// Remove an API key for a provider.
    /// Rebuilds the provider registry so the removal takes effect immediately.
    pub fn remove_api_key(&mut self, provider: &str) -> bool {
        let removed = self.settings.api_keys.remove(provider).is_some();
        if removed {
            self.rebuild_providers();
        }
        removed
    }

    /// Replace the providers and drop metadata cached from the old ones.
    fn rebuild_providers(&mut self) {
        let registry = PriceProviderRegistry::new_with_defaults(&self.settings.api_keys);
        self.price_service = PriceService::new(registry);
        self.info_cache.clear();
    }

    #[must_use]
    pub fn get_provider_names(&self) -> Vec<String> {
        self.price_service.get_provider_names()
    }

    // ── Cache Management ────────────────────────────────────────────

    #[must_use]
    pub fn cached_series_count(&self) -> usize {
        self.price_cache.len()
    }

    #[must_use]
    pub fn cached_info_count(&self) -> usize {
        self.info_cache.len()
    }

    /// Drop expired series and metadata entries. Returns the number removed.
    pub fn cache_prune_expired(&mut self) -> usize {
        let now = Utc::now();
        self.price_cache.prune_expired(now) + self.info_cache.prune_expired(now)
    }

    pub fn cache_clear(&mut self) {
        self.price_cache.clear();
        self.info_cache.clear();
    }
}
