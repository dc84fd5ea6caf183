use serde::{Deserialize, Serialize};

use super::metrics::InvestmentMetrics;

/// Sums across every symbol in the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    /// Sum of principals
    pub total_investment: f64,

    /// Sum of final values
    pub total_final_value: f64,

    /// total_final_value − total_investment
    pub total_profit_loss: f64,

    /// total_profit_loss / total_investment × 100 (0 if nothing invested)
    pub total_profit_loss_pct: f64,

    /// Number of symbols included
    pub symbol_count: usize,
}

/// Roll-up of every symbol that shares a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,

    pub total_investment: f64,

    pub total_final_value: f64,

    pub total_profit_loss: f64,

    /// Number of member symbols
    pub count: usize,

    /// Members in the order they were first encountered
    pub member_symbols: Vec<String>,

    /// total_profit_loss / total_investment × 100; `None` when nothing invested
    pub roi: Option<f64>,

    /// This category's share of the portfolio's final value, in percent
    pub allocation_pct: f64,
}

/// Per-symbol row of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingReport {
    pub symbol: String,
    pub metrics: InvestmentMetrics,
}

/// A symbol singled out by a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSymbol {
    pub symbol: String,
    pub category: String,
    pub profit_loss: f64,
    pub profit_loss_pct: f64,
}

/// A category singled out by a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCategory {
    pub category: String,
    pub roi: Option<f64>,
    pub count: usize,
    pub total_profit_loss: f64,
}

/// Everything a "calculate" run hands to presentation.
///
/// Built from scratch on every run; a new calculation replaces the
/// previous report, nothing is updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReport {
    pub totals: PortfolioTotals,

    /// Per-symbol metrics in input order
    pub holdings: Vec<HoldingReport>,

    /// Category roll-ups in first-appearance order
    pub categories: Vec<CategorySummary>,

    /// Symbols ordered by profit_loss_pct, best first (stable on ties)
    pub performance_ranking: Vec<String>,

    pub best_performer: RankedSymbol,

    pub worst_performer: RankedSymbol,

    /// Highest-ROI category; `None` only if there are no categories
    pub best_category: Option<RankedCategory>,
}

impl PortfolioReport {
    /// Look up a category roll-up by name.
    pub fn category(&self, name: &str) -> Option<&CategorySummary> {
        self.categories.iter().find(|c| c.category == name)
    }

    /// Look up the metrics of one symbol (case-insensitive).
    pub fn holding(&self, symbol: &str) -> Option<&InvestmentMetrics> {
        self.holdings
            .iter()
            .find(|h| h.symbol.eq_ignore_ascii_case(symbol))
            .map(|h| &h.metrics)
    }
}
