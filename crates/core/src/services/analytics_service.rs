use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::errors::CoreError;
use crate::models::metrics::InvestmentMetrics;
use crate::models::report::{
    CategorySummary, HoldingReport, PortfolioReport, PortfolioTotals, RankedCategory,
    RankedSymbol,
};

/// Rolls per-symbol metrics up into a [`PortfolioReport`]: overall totals,
/// per-category summaries and best/worst rankings.
///
/// Pure business logic without I/O. Input order matters: it fixes
/// the order of categories, of member symbols, and breaks ranking ties.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Build a report from `(symbol, metrics)` pairs, each metrics value
    /// already tagged with its category.
    ///
    /// Fails with `CoreError::EmptyPortfolio` on empty input and with
    /// `CoreError::InvalidInput` if a symbol appears twice.
    pub fn aggregate(
        &self,
        metrics_by_symbol: &[(String, InvestmentMetrics)],
    ) -> Result<PortfolioReport, CoreError> {
        if metrics_by_symbol.is_empty() {
            return Err(CoreError::EmptyPortfolio);
        }

        let mut seen = HashSet::new();
        for (symbol, _) in metrics_by_symbol {
            if !seen.insert(symbol.as_str()) {
                return Err(CoreError::InvalidInput(format!(
                    "symbol {symbol} appears more than once"
                )));
            }
        }

        // 1. Overall totals
        let total_investment: f64 = metrics_by_symbol.iter().map(|(_, m)| m.principal).sum();
        let total_final_value: f64 = metrics_by_symbol.iter().map(|(_, m)| m.final_value).sum();
        let total_profit_loss = total_final_value - total_investment;
        let totals = PortfolioTotals {
            total_investment,
            total_final_value,
            total_profit_loss,
            total_profit_loss_pct: percent_of(total_profit_loss, total_investment).unwrap_or(0.0),
            symbol_count: metrics_by_symbol.len(),
        };

        // 2. Category roll-up, first-appearance order
        let categories = roll_up_categories(metrics_by_symbol, total_final_value);

        // 3. Rankings (stable sorts keep input order among ties)
        let mut performers: Vec<&(String, InvestmentMetrics)> = metrics_by_symbol.iter().collect();
        performers.sort_by(|a, b| descending(a.1.profit_loss_pct, b.1.profit_loss_pct));

        let best = performers[0];
        let worst = performers[performers.len() - 1];

        let mut by_roi: Vec<&CategorySummary> = categories.iter().collect();
        by_roi.sort_by(|a, b| match (a.roi, b.roi) {
            (Some(x), Some(y)) => descending(x, y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        let best_category = by_roi.first().map(|c| RankedCategory {
            category: c.category.clone(),
            roi: c.roi,
            count: c.count,
            total_profit_loss: c.total_profit_loss,
        });

        debug!(
            symbols = totals.symbol_count,
            categories = categories.len(),
            total_profit_loss = totals.total_profit_loss,
            "aggregated portfolio"
        );

        Ok(PortfolioReport {
            totals,
            holdings: metrics_by_symbol
                .iter()
                .map(|(symbol, metrics)| HoldingReport {
                    symbol: symbol.clone(),
                    metrics: metrics.clone(),
                })
                .collect(),
            performance_ranking: performers.iter().map(|(s, _)| s.clone()).collect(),
            best_performer: ranked(best),
            worst_performer: ranked(worst),
            categories,
            best_category,
        })
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}

fn roll_up_categories(
    metrics_by_symbol: &[(String, InvestmentMetrics)],
    portfolio_final_value: f64,
) -> Vec<CategorySummary> {
    let mut categories: Vec<CategorySummary> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (symbol, metrics) in metrics_by_symbol {
        let idx = *index.entry(metrics.category.as_str()).or_insert_with(|| {
            categories.push(CategorySummary {
                category: metrics.category.clone(),
                total_investment: 0.0,
                total_final_value: 0.0,
                total_profit_loss: 0.0,
                count: 0,
                member_symbols: Vec::new(),
                roi: None,
                allocation_pct: 0.0,
            });
            categories.len() - 1
        });

        let summary = &mut categories[idx];
        summary.total_investment += metrics.principal;
        summary.total_final_value += metrics.final_value;
        summary.total_profit_loss += metrics.profit_loss;
        summary.count += 1;
        summary.member_symbols.push(symbol.clone());
    }

    for summary in &mut categories {
        summary.roi = percent_of(summary.total_profit_loss, summary.total_investment);
        summary.allocation_pct =
            percent_of(summary.total_final_value, portfolio_final_value).unwrap_or(0.0);
    }

    categories
}

/// `part / whole * 100`, or `None` when `whole` is zero.
fn percent_of(part: f64, whole: f64) -> Option<f64> {
    (whole != 0.0).then(|| part / whole * 100.0)
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn ranked((symbol, metrics): &(String, InvestmentMetrics)) -> RankedSymbol {
    RankedSymbol {
        symbol: symbol.clone(),
        category: metrics.category.clone(),
        profit_loss: metrics.profit_loss,
        profit_loss_pct: metrics.profit_loss_pct,
    }
}
