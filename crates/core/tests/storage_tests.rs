// ═══════════════════════════════════════════════════════════════════
// Storage Tests — ConfigStore JSON export/import and files
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use std::collections::BTreeMap;
use whatif_core::errors::CoreError;
use whatif_core::models::config::{CustomStock, UserConfig};
use whatif_core::storage::config_file::ConfigStore;

fn sample_config() -> UserConfig {
    let mut config = UserConfig::new();
    config.custom_stocks.insert(
        "BTC-USD".into(),
        CustomStock {
            name: "Bitcoin USD".into(),
            category: "Crypto".into(),
        },
    );
    config.custom_categories.insert("Space".into());
    config.removed_default_stocks.insert("NU".into());

    let mut amounts = BTreeMap::new();
    amounts.insert("AAPL".to_string(), 500.0);
    amounts.insert("BTC-USD".to_string(), 250.0);
    config.investment_presets.insert("Balanced".into(), amounts);
    config
}

// ═══════════════════════════════════════════════════════════════════
// JSON
// ═══════════════════════════════════════════════════════════════════

mod json {
    use super::*;

    #[test]
    fn export_then_import_is_identical() {
        let config = sample_config();
        let json = ConfigStore::export_to_json(&config).unwrap();
        assert_eq!(ConfigStore::import_from_json(&json).unwrap(), config);
    }

    #[test]
    fn export_layout() {
        let json = ConfigStore::export_to_json(&sample_config()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["custom_stocks"]["BTC-USD"]["name"], "Bitcoin USD");
        assert_eq!(value["custom_stocks"]["BTC-USD"]["category"], "Crypto");
        assert_eq!(value["custom_categories"][0], "Space");
        assert_eq!(value["investment_presets"]["Balanced"]["AAPL"], 500.0);
        assert_eq!(value["removed_default_stocks"][0], "NU");
        assert_eq!(value.as_object().unwrap().len(), 4);
    }

    #[test]
    fn export_is_pretty_printed() {
        let json = ConfigStore::export_to_json(&UserConfig::new()).unwrap();
        assert!(json.contains('\n'));
    }

    #[test]
    fn empty_document_imports_as_pristine() {
        assert!(ConfigStore::import_from_json("{}").unwrap().is_pristine());
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(matches!(
            ConfigStore::import_from_json("{\"custom_stocks\": 5}"),
            Err(CoreError::Deserialization(_))
        ));
    }

    #[test]
    fn negative_preset_amount_is_rejected() {
        let json = r#"{"investment_presets": {"Bad": {"AAPL": -10.0}}}"#;
        match ConfigStore::import_from_json(json) {
            Err(CoreError::ValidationError(msg)) => {
                assert!(msg.contains("Bad"));
                assert!(msg.contains("AAPL"));
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn export_file_name() {
        let at = NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(
            ConfigStore::export_file_name(at),
            "portfolio_config_20250115_093000.json"
        );
    }
}

// ═══════════════════════════════════════════════════════════════════
// Files
// ═══════════════════════════════════════════════════════════════════

mod files {
    use super::*;

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.json");
        let path = path.to_str().unwrap();

        ConfigStore::save_to_file(&sample_config(), path).unwrap();
        assert_eq!(ConfigStore::load_from_file(path).unwrap(), sample_config());
    }

    #[test]
    fn save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.json");
        let path = path.to_str().unwrap();

        ConfigStore::save_to_file(&sample_config(), path).unwrap();
        ConfigStore::save_to_file(&UserConfig::new(), path).unwrap();
        assert!(ConfigStore::load_from_file(path).unwrap().is_pristine());
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert!(matches!(
            ConfigStore::load_from_file(path.to_str().unwrap()),
            Err(CoreError::FileIO(_))
        ));
    }

    #[test]
    fn load_corrupted_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ this is not json").unwrap();
        assert!(matches!(
            ConfigStore::load_from_file(path.to_str().unwrap()),
            Err(CoreError::Deserialization(_))
        ));
    }
}
