use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A user-added stock, keyed by symbol in [`UserConfig::custom_stocks`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomStock {
    pub name: String,
    pub category: String,
}

/// Preset name → (symbol → amount in USD).
pub type InvestmentPresets = BTreeMap<String, BTreeMap<String, f64>>;

/// Everything the user customizes, in the exported JSON layout.
///
/// Field names are the JSON keys and must stay stable so that exported
/// files import back into identical simulations. Sorted containers keep
/// the output deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    /// Symbol → custom stock
    #[serde(default)]
    pub custom_stocks: BTreeMap<String, CustomStock>,

    /// Categories the user created beyond the predefined ones
    #[serde(default)]
    pub custom_categories: BTreeSet<String>,

    /// Saved investment presets
    #[serde(default)]
    pub investment_presets: InvestmentPresets,

    /// Built-in stocks hidden from the universe
    #[serde(default)]
    pub removed_default_stocks: BTreeSet<String>,
}

impl UserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if nothing has been customized.
    pub fn is_pristine(&self) -> bool {
        self.custom_stocks.is_empty()
            && self.custom_categories.is_empty()
            && self.investment_presets.is_empty()
            && self.removed_default_stocks.is_empty()
    }
}
