use thiserror::Error;

/// Unified error type for the entire whatif-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Computation contract ────────────────────────────────────────
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot aggregate an empty portfolio")]
    EmptyPortfolio,

    // ── Simulation ──────────────────────────────────────────────────
    #[error("No active investments — set an amount greater than $0 for at least one stock")]
    NoActiveInvestments,

    #[error("No price data available for any of the requested symbols")]
    NoPriceData,

    #[error("Invalid date range: start ({start}) must be before end ({end})")]
    InvalidDateRange { start: String, end: String },

    // ── Portfolio configuration ─────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Stock not found: {0}")]
    StockNotFound(String),

    #[error("Preset not found: {0}")]
    PresetNotFound(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No price provider registered")]
    NoProvider,

    // ── Serialization / File ────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),

    #[error("Random source unavailable: {0}")]
    Randomness(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL, including the apikey query parameter.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}

impl From<getrandom::Error> for CoreError {
    fn from(e: getrandom::Error) -> Self {
        CoreError::Randomness(e.to_string())
    }
}
