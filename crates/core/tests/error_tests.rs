// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use whatif_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn invalid_input() {
        let err = CoreError::InvalidInput("price series is empty".into());
        assert_eq!(err.to_string(), "Invalid input: price series is empty");
    }

    #[test]
    fn empty_portfolio() {
        assert_eq!(
            CoreError::EmptyPortfolio.to_string(),
            "Cannot aggregate an empty portfolio"
        );
    }

    #[test]
    fn no_active_investments() {
        assert_eq!(
            CoreError::NoActiveInvestments.to_string(),
            "No active investments — set an amount greater than $0 for at least one stock"
        );
    }

    #[test]
    fn no_price_data() {
        assert_eq!(
            CoreError::NoPriceData.to_string(),
            "No price data available for any of the requested symbols"
        );
    }

    #[test]
    fn invalid_date_range() {
        let err = CoreError::InvalidDateRange {
            start: "2025-02-01".into(),
            end: "2025-01-01".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid date range: start (2025-02-01) must be before end (2025-01-01)"
        );
    }

    #[test]
    fn validation_error() {
        let err = CoreError::ValidationError("Symbol must not be empty".into());
        assert_eq!(err.to_string(), "Validation failed: Symbol must not be empty");
    }

    #[test]
    fn stock_not_found() {
        let err = CoreError::StockNotFound("ZZZZ".into());
        assert_eq!(err.to_string(), "Stock not found: ZZZZ");
    }

    #[test]
    fn preset_not_found() {
        let err = CoreError::PresetNotFound("Tech heavy".into());
        assert_eq!(err.to_string(), "Preset not found: Tech heavy");
    }

    #[test]
    fn api_error() {
        let err = CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: "rate limited".into(),
        };
        assert_eq!(err.to_string(), "API error (Yahoo Finance): rate limited");
    }

    #[test]
    fn network() {
        let err = CoreError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn no_provider() {
        assert_eq!(CoreError::NoProvider.to_string(), "No price provider registered");
    }

    #[test]
    fn serialization() {
        let err = CoreError::Serialization("bad float".into());
        assert_eq!(err.to_string(), "Serialization error: bad float");
    }

    #[test]
    fn deserialization() {
        let err = CoreError::Deserialization("expected value".into());
        assert_eq!(err.to_string(), "Deserialization error: expected value");
    }

    #[test]
    fn file_io() {
        let err = CoreError::FileIO("permission denied".into());
        assert_eq!(err.to_string(), "File I/O error: permission denied");
    }

    #[test]
    fn randomness() {
        let err = CoreError::Randomness("no entropy".into());
        assert_eq!(err.to_string(), "Random source unavailable: no entropy");
    }
}

// ── From conversions ────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: CoreError = io.into();
        match err {
            CoreError::FileIO(msg) => assert!(msg.contains("missing.json")),
            other => panic!("expected FileIO, got {other:?}"),
        }
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn question_mark_converts_io_error() {
        fn read_missing() -> Result<String, CoreError> {
            Ok(std::fs::read_to_string("/definitely/not/here/config.json")?)
        }
        assert!(matches!(read_missing(), Err(CoreError::FileIO(_))));
    }
}

// ── Trait bounds ────────────────────────────────────────────────────

mod traits {
    use super::*;

    #[test]
    fn is_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&CoreError::NoPriceData);
    }

    #[test]
    fn is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CoreError>();
    }

    #[test]
    fn debug_names_the_variant() {
        let dbg = format!("{:?}", CoreError::EmptyPortfolio);
        assert_eq!(dbg, "EmptyPortfolio");
    }
}
