use tracing::debug;

use crate::errors::CoreError;
use crate::models::metrics::InvestmentMetrics;
use crate::models::price::PriceSeries;

/// Trading days used to annualize daily statistics.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Standard deviations at or below this are treated as zero.
const ZERO_STD_DEV: f64 = 1e-12;

/// Turns a price series and a principal into [`InvestmentMetrics`].
///
/// Pure business logic without I/O or hidden state. The same inputs always
/// produce bit-identical output.
pub struct MetricsService;

impl MetricsService {
    pub fn new() -> Self {
        Self
    }

    /// Simulate buying `principal` dollars of the stock at the first close
    /// and holding until the last close.
    ///
    /// Fails with `CoreError::InvalidInput` for an empty series or a
    /// principal that is not a positive finite number. The returned
    /// metrics carry the default category; tag them with
    /// [`InvestmentMetrics::with_category`].
    pub fn compute_metrics(
        &self,
        series: &PriceSeries,
        principal: f64,
    ) -> Result<InvestmentMetrics, CoreError> {
        if series.is_empty() {
            return Err(CoreError::InvalidInput("price series is empty".into()));
        }
        if !principal.is_finite() || principal <= 0.0 {
            return Err(CoreError::InvalidInput(format!(
                "principal must be positive, got {principal}"
            )));
        }

        let start_price = series.first().price;
        let end_price = series.last().price;

        let shares = principal / start_price;
        let final_value = shares * end_price;
        let profit_loss = final_value - principal;
        let profit_loss_pct = profit_loss / principal * 100.0;

        let (min_price, max_price) = series
            .closes()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p), hi.max(p))
            });

        let prices: Vec<f64> = series.closes().collect();
        let returns = daily_returns(&prices);

        let metrics = InvestmentMetrics {
            principal,
            start_price,
            end_price,
            shares,
            final_value,
            profit_loss,
            profit_loss_pct,
            max_price,
            min_price,
            max_value: shares * max_price,
            min_value: shares * min_price,
            volatility_pct: annualized_volatility_pct(&returns),
            max_drawdown_pct: max_drawdown_pct(&prices),
            sharpe_ratio: sharpe_ratio(&returns),
            category: InvestmentMetrics::default_category(),
        };

        debug!(
            points = series.len(),
            principal,
            final_value = metrics.final_value,
            "computed investment metrics"
        );

        Ok(metrics)
    }
}

impl Default for MetricsService {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple daily returns `p[i] / p[i-1] - 1`; one shorter than `prices`.
pub fn daily_returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample (Bessel-corrected, divisor `n - 1`) standard deviation.
/// Returns 0 for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Annualized volatility of daily returns, in percent.
///
/// 0 for fewer than two returns and for the same negligible dispersion that
/// zeroes [`sharpe_ratio`].
pub fn annualized_volatility_pct(returns: &[f64]) -> f64 {
    let std_dev = sample_std_dev(returns);
    if std_dev <= ZERO_STD_DEV {
        return 0.0;
    }
    std_dev * TRADING_DAYS_PER_YEAR.sqrt() * 100.0
}

/// Deepest fall below the running peak, in percent (≤ 0).
///
/// The peak is updated before the ratio is taken at each index, so the
/// first point always contributes 0.
pub fn max_drawdown_pct(prices: &[f64]) -> f64 {
    let Some(&first) = prices.first() else {
        return 0.0;
    };
    let mut peak = first;
    let mut deepest = 0.0_f64;
    for &price in prices {
        if price > peak {
            peak = price;
        }
        let drawdown = (price - peak) / peak;
        if drawdown < deepest {
            deepest = drawdown;
        }
    }
    deepest * 100.0
}

/// Annualized Sharpe ratio with a zero risk-free rate.
///
/// 0 when the returns have no dispersion (including fewer than two returns):
/// risk-adjusted return is undefined there.
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    let std_dev = sample_std_dev(returns);
    if std_dev <= ZERO_STD_DEV {
        return 0.0;
    }
    mean(returns) / std_dev * TRADING_DAYS_PER_YEAR.sqrt()
}
