use std::collections::BTreeMap;

use tracing::debug;

use crate::errors::CoreError;
use crate::models::category::{is_predefined, DEFAULT_CATEGORY};
use crate::models::config::{CustomStock, UserConfig};
use crate::models::portfolio::Portfolio;
use crate::models::stock::default_stocks;

/// Step between random amounts, in USD.
const RANDOM_AMOUNT_STEP: f64 = 50.0;
/// Number of steps: random amounts fall in `0..=1000`.
const RANDOM_AMOUNT_STEPS: u8 = 20;

/// Manages the stock universe, per-stock amounts and investment presets.
///
/// Pure business logic with no I/O or API calls.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    // ── Stock universe ──────────────────────────────────────────────

    /// Add (or replace) a custom stock. Symbol validation against a market
    /// data provider is the caller's job; see `InvestmentSimulator::add_validated_stock`.
    pub fn add_custom_stock(
        &self,
        portfolio: &mut Portfolio,
        symbol: &str,
        name: &str,
        category: &str,
    ) -> Result<String, CoreError> {
        let symbol = normalize_symbol(symbol)?;
        let category = category.trim();
        if category.is_empty() {
            return Err(CoreError::ValidationError(
                "Category must not be empty".into(),
            ));
        }
        let name = match name.trim() {
            "" => symbol.clone(),
            n => n.to_string(),
        };

        if !is_predefined(category) && category != DEFAULT_CATEGORY {
            portfolio.config.custom_categories.insert(category.to_string());
        }
        portfolio.config.custom_stocks.insert(
            symbol.clone(),
            CustomStock {
                name,
                category: category.to_string(),
            },
        );
        debug!(symbol = %symbol, category, "custom stock added");
        Ok(symbol)
    }

    /// Remove a custom stock and the amount entered for it.
    pub fn remove_custom_stock(&self, portfolio: &mut Portfolio, symbol: &str) -> Result<(), CoreError> {
        let symbol = symbol.trim().to_uppercase();
        portfolio
            .config
            .custom_stocks
            .remove(&symbol)
            .ok_or_else(|| CoreError::StockNotFound(symbol.clone()))?;
        portfolio.investments.remove(&symbol);
        Ok(())
    }

    /// Hide a built-in stock from the universe and clear its amount.
    pub fn remove_default_stock(&self, portfolio: &mut Portfolio, symbol: &str) -> Result<(), CoreError> {
        let symbol = symbol.trim().to_uppercase();
        if !default_stocks().iter().any(|s| s.symbol == symbol) {
            return Err(CoreError::StockNotFound(symbol));
        }
        portfolio.investments.remove(&symbol);
        portfolio.config.removed_default_stocks.insert(symbol);
        Ok(())
    }

    /// Bring a hidden built-in stock back. Returns `false` if it was not hidden.
    pub fn restore_default_stock(&self, portfolio: &mut Portfolio, symbol: &str) -> bool {
        portfolio
            .config
            .removed_default_stocks
            .remove(&symbol.trim().to_uppercase())
    }

    // ── Amounts ─────────────────────────────────────────────────────

    /// Set the amount for one stock of the universe.
    pub fn set_investment(&self, portfolio: &mut Portfolio, symbol: &str, amount: f64) -> Result<(), CoreError> {
        validate_amount(amount)?;
        let symbol = symbol.trim().to_uppercase();
        if !portfolio.stock_universe().iter().any(|s| s.symbol == symbol) {
            return Err(CoreError::StockNotFound(symbol));
        }
        portfolio.investments.insert(symbol, amount);
        Ok(())
    }

    /// Put the same amount on every stock in the universe.
    pub fn apply_amount_to_all(&self, portfolio: &mut Portfolio, amount: f64) -> Result<(), CoreError> {
        validate_amount(amount)?;
        for stock in portfolio.stock_universe() {
            portfolio.investments.insert(stock.symbol, amount);
        }
        Ok(())
    }

    /// Set every amount back to 0.
    pub fn reset_investments(&self, portfolio: &mut Portfolio) {
        for amount in portfolio.investments.values_mut() {
            *amount = 0.0;
        }
    }

    /// Give every stock a random multiple of $50 between $0 and $1,000.
    pub fn apply_random_amounts(&self, portfolio: &mut Portfolio) -> Result<(), CoreError> {
        let universe = portfolio.stock_universe();
        let steps = random_steps(universe.len())?;
        for (stock, steps) in universe.into_iter().zip(steps) {
            portfolio
                .investments
                .insert(stock.symbol, f64::from(steps) * RANDOM_AMOUNT_STEP);
        }
        Ok(())
    }

    // ── Presets ─────────────────────────────────────────────────────

    /// Save the current active investments under `name` (replacing any
    /// preset with that name). Returns the number of stocks saved.
    pub fn save_preset(&self, portfolio: &mut Portfolio, name: &str) -> Result<usize, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::ValidationError(
                "Preset name must not be empty".into(),
            ));
        }
        let amounts: BTreeMap<String, f64> = portfolio.active_investments().into_iter().collect();
        let count = amounts.len();
        portfolio
            .config
            .investment_presets
            .insert(name.to_string(), amounts);
        Ok(count)
    }

    /// Replace all current amounts with the ones stored in preset `name`.
    pub fn load_preset(&self, portfolio: &mut Portfolio, name: &str) -> Result<(), CoreError> {
        let preset = portfolio
            .config
            .investment_presets
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::PresetNotFound(name.to_string()))?;

        self.reset_investments(portfolio);
        for (symbol, amount) in preset {
            portfolio.investments.insert(symbol.to_uppercase(), amount);
        }
        Ok(())
    }

    pub fn delete_preset(&self, portfolio: &mut Portfolio, name: &str) -> Result<(), CoreError> {
        portfolio
            .config
            .investment_presets
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| CoreError::PresetNotFound(name.to_string()))
    }

    /// Preset names with the number of stocks in each, sorted by name.
    pub fn list_presets(&self, portfolio: &Portfolio) -> Vec<(String, usize)> {
        portfolio
            .config
            .investment_presets
            .iter()
            .map(|(name, amounts)| (name.clone(), amounts.len()))
            .collect()
    }

    // ── Reset ───────────────────────────────────────────────────────

    /// Drop every customization and every amount.
    pub fn clear_all(&self, portfolio: &mut Portfolio) {
        portfolio.config = UserConfig::default();
        portfolio.investments.clear();
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a random byte uniformly onto `0..=RANDOM_AMOUNT_STEPS`. Bytes past
/// the last whole multiple of the step count are rejected.
fn step_from_byte(byte: u8) -> Option<u8> {
    let outcomes = u16::from(RANDOM_AMOUNT_STEPS) + 1;
    let limit = 256 - 256 % outcomes;
    let byte = u16::from(byte);
    (byte < limit).then(|| (byte % outcomes) as u8)
}

/// Draw `count` uniform step counts from the OS random source.
fn random_steps(count: usize) -> Result<Vec<u8>, CoreError> {
    let mut steps = Vec::with_capacity(count);
    let mut bytes = [0u8; 32];
    while steps.len() < count {
        getrandom::getrandom(&mut bytes)?;
        steps.extend(
            bytes
                .iter()
                .filter_map(|&b| step_from_byte(b))
                .take(count - steps.len()),
        );
    }
    Ok(steps)
}

fn normalize_symbol(symbol: &str) -> Result<String, CoreError> {
    let upper = symbol.trim().to_uppercase();
    if upper.is_empty() {
        return Err(CoreError::ValidationError(
            "Symbol must not be empty".into(),
        ));
    }
    if !upper
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '^' | '='))
    {
        return Err(CoreError::ValidationError(format!(
            "Invalid symbol '{symbol}': only letters, digits and - . ^ = are allowed"
        )));
    }
    Ok(upper)
}

fn validate_amount(amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(CoreError::ValidationError(format!(
            "Amount must be a non-negative number, got {amount}"
        )));
    }
    Ok(())
}
