use chrono::NaiveDateTime;

use crate::errors::CoreError;
use crate::models::config::UserConfig;

/// Export/import of the user configuration as a portable JSON document.
///
/// The document has exactly four top-level keys: `custom_stocks`,
/// `custom_categories`, `investment_presets`, `removed_default_stocks`.
/// Missing keys import as empty.
pub struct ConfigStore;

impl ConfigStore {
    /// Serialize the configuration to pretty-printed JSON.
    pub fn export_to_json(config: &UserConfig) -> Result<String, CoreError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize configuration: {e}")))
    }

    /// Parse a configuration previously produced by `export_to_json`.
    pub fn import_from_json(json: &str) -> Result<UserConfig, CoreError> {
        let config: UserConfig = serde_json::from_str(json)
            .map_err(|e| CoreError::Deserialization(format!("Failed to parse configuration: {e}")))?;

        if let Some((name, symbol, amount)) = config
            .investment_presets
            .iter()
            .flat_map(|(name, amounts)| amounts.iter().map(move |(s, a)| (name, s, *a)))
            .find(|(_, _, a)| !a.is_finite() || *a < 0.0)
        {
            return Err(CoreError::ValidationError(format!(
                "Preset '{name}' has an invalid amount for {symbol}: {amount}"
            )));
        }

        Ok(config)
    }

    /// Suggested download name, e.g. `portfolio_config_20250115_093000.json`.
    pub fn export_file_name(at: NaiveDateTime) -> String {
        format!("portfolio_config_{}.json", at.format("%Y%m%d_%H%M%S"))
    }

    /// Write the configuration as JSON to a file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(config: &UserConfig, path: &str) -> Result<(), CoreError> {
        let json = Self::export_to_json(config)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read a JSON configuration file from disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str) -> Result<UserConfig, CoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::import_from_json(&json)
    }
}
