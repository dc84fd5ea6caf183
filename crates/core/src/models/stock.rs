use serde::{Deserialize, Serialize};

/// A stock the user can put money into.
///
/// **Equality and hashing** are based solely on `symbol`, NOT on `name`
/// or `category`, so the same ticker never appears twice in a universe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockEntry {
    /// Ticker symbol, uppercased (e.g., "AAPL", "BTC-USD")
    pub symbol: String,

    /// Human-readable name (e.g., "Apple Inc.")
    pub name: String,

    /// Reporting category (e.g., "Technology")
    pub category: String,
}

impl PartialEq for StockEntry {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

impl Eq for StockEntry {}

impl std::hash::Hash for StockEntry {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
    }
}

impl StockEntry {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into().trim().to_uppercase(),
            name: name.into(),
            category: category.into(),
        }
    }
}

/// The built-in universe offered before any customization, in display order.
pub fn default_stocks() -> Vec<StockEntry> {
    [
        ("NU", "NU Holdings (Nu Bank)", "Fintech"),
        ("NVDA", "NVIDIA Corporation", "Technology"),
        ("AAPL", "Apple Inc.", "Technology"),
        ("GOOGL", "Alphabet Inc. (Google)", "Technology"),
        ("META", "Meta Platforms (Facebook)", "Technology"),
        ("MSFT", "Microsoft Corporation", "Technology"),
        ("AMZN", "Amazon.com Inc.", "E-commerce"),
        ("TSLA", "Tesla Inc.", "Automotive"),
        ("NFLX", "Netflix Inc.", "Entertainment"),
        ("PYPL", "PayPal Holdings", "Fintech"),
        ("KO", "Coca-Cola Company", "Consumer"),
        ("JNJ", "Johnson & Johnson", "Healthcare"),
    ]
    .into_iter()
    .map(|(symbol, name, category)| StockEntry::new(symbol, name, category))
    .collect()
}

/// Company metadata shown next to the simulation results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockInfo {
    pub name: String,
    pub sector: String,
    pub industry: String,
    pub currency: String,
    /// Market capitalization in `currency`; 0 when unknown
    pub market_cap: f64,
    /// Trailing price/earnings ratio, if reported
    pub pe_ratio: Option<f64>,
}

impl StockInfo {
    /// Placeholder used when no provider can describe `symbol`.
    pub fn fallback(symbol: &str) -> Self {
        Self {
            name: symbol.to_uppercase(),
            sector: "N/A".into(),
            industry: "N/A".into(),
            currency: "USD".into(),
            market_cap: 0.0,
            pe_ratio: None,
        }
    }
}
