use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use time::OffsetDateTime;
use tracing::debug;
use yahoo_finance_api::{YQuoteSummary, YSearchResultOpt};

use crate::errors::CoreError;
use crate::models::date_range::DateRange;
use crate::models::price::PricePoint;
use crate::models::stock::StockInfo;
use super::traits::PriceProvider;

const PROVIDER: &str = "Yahoo Finance";

/// Yahoo Finance API provider for stock, ETF and crypto (`BTC-USD`) prices.
///
/// - **Free**: No API key required.
/// - **No strict rate limits** (unofficial public API).
/// - **Coverage**: Global equities, ETFs, indices, mutual funds, crypto pairs.
/// - **Data**: Full daily history.
///
/// Uses the `yahoo_finance_api` crate which wraps Yahoo Finance's
/// public endpoints. Prices are returned in the symbol's native currency
/// (typically USD).
///
/// **Note**: Not WASM-compatible (uses native reqwest/tokio).
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new()
            .map_err(|e| api_error(format!("Failed to create connector: {e}")))?;
        Ok(Self { connector })
    }

    /// Convert a `chrono::NaiveDate` to `time::OffsetDateTime` (midnight UTC).
    fn to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime, CoreError> {
        let month = time::Month::try_from(date.month() as u8)
            .map_err(|e| api_error(format!("Invalid month in {date}: {e}")))?;

        let odt = time::Date::from_calendar_date(date.year(), month, date.day() as u8)
            .map_err(|e| api_error(format!("Invalid date {date}: {e}")))?
            .with_hms(0, 0, 0)
            .map_err(|e| api_error(format!("Invalid time for {date}: {e}")))?
            .assume_utc();
        Ok(odt)
    }

    /// Convert a unix timestamp (seconds) to `chrono::NaiveDate`.
    fn timestamp_to_naive_date(ts: i64) -> Option<NaiveDate> {
        chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
    }
}

fn api_error(message: String) -> CoreError {
    CoreError::Api {
        provider: PROVIDER.into(),
        message,
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn display_name(short: Option<&String>, long: Option<&String>) -> Option<String> {
    non_empty(short).or_else(|| non_empty(long))
}

/// Map a quote summary onto `StockInfo`, keeping the fallback value for
/// every field Yahoo leaves out. `None` when the summary carries nothing.
fn stock_info_from_summary(symbol: &str, summary: &YQuoteSummary) -> Option<StockInfo> {
    let data = summary.quote_summary.as_ref()?.result.as_ref()?.first()?;
    let fallback = StockInfo::fallback(symbol);

    let name = data
        .quote_type
        .as_ref()
        .and_then(|q| display_name(q.short_name.as_ref(), q.long_name.as_ref()));
    let profile = data.asset_profile.as_ref();
    let detail = data.summary_detail.as_ref();

    let info = StockInfo {
        name: name.unwrap_or_else(|| fallback.name.clone()),
        sector: profile
            .and_then(|p| non_empty(p.sector.as_ref()))
            .unwrap_or_else(|| fallback.sector.clone()),
        industry: profile
            .and_then(|p| non_empty(p.industry.as_ref()))
            .unwrap_or_else(|| fallback.industry.clone()),
        currency: detail
            .and_then(|d| non_empty(d.currency.as_ref()))
            .map(|c| c.to_uppercase())
            .unwrap_or_else(|| fallback.currency.clone()),
        market_cap: detail
            .and_then(|d| d.market_cap)
            .map(|cap| cap as f64)
            .unwrap_or(fallback.market_cap),
        pe_ratio: detail
            .and_then(|d| d.trailing_pe)
            .filter(|pe| pe.is_finite()),
    };

    (info != fallback).then_some(info)
}

/// Display name of the search hit whose symbol matches exactly.
fn name_from_search(symbol: &str, search: &YSearchResultOpt) -> Option<String> {
    search
        .quotes
        .iter()
        .find(|q| q.symbol.eq_ignore_ascii_case(symbol))
        .and_then(|q| display_name(q.short_name.as_ref(), q.long_name.as_ref()))
}

#[async_trait]
impl PriceProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_price_series(
        &self,
        symbol: &str,
        range: &DateRange,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let start = Self::to_offset_datetime(range.start())?;
        let end = Self::to_offset_datetime(range.end())?;

        let resp = self
            .connector
            .get_quote_history(symbol, start, end)
            .await
            .map_err(|e| api_error(format!("Failed to fetch history for {symbol}: {e}")))?;

        let quotes = match resp.quotes() {
            Ok(quotes) => quotes,
            Err(e) => {
                // Yahoo answers an empty window with a body that has no quotes.
                debug!(symbol, error = %e, "no quotes in Yahoo response");
                return Ok(Vec::new());
            }
        };

        let points: Vec<PricePoint> = quotes
            .iter()
            .filter_map(|q| {
                let date = Self::timestamp_to_naive_date(q.timestamp as i64)?;
                range.contains(date).then_some(PricePoint {
                    date,
                    price: q.close,
                })
            })
            .collect();

        Ok(points)
    }

    async fn validate_symbol(&self, symbol: &str) -> Result<Option<String>, CoreError> {
        let upper = symbol.trim().to_uppercase();
        match self.connector.get_latest_quotes(&upper, "1d").await {
            Ok(resp) => Ok(resp.last_quote().ok().map(|_| upper)),
            Err(e) => {
                debug!(symbol = %upper, error = %e, "Yahoo rejected symbol");
                Ok(None)
            }
        }
    }

    async fn get_stock_info(&self, symbol: &str) -> Result<StockInfo, CoreError> {
        let upper = symbol.trim().to_uppercase();

        // The quote summary endpoint needs a session crumb held by a mutable connector.
        let mut session = yahoo_finance_api::YahooConnector::new()
            .map_err(|e| api_error(format!("Failed to create connector: {e}")))?;
        match session.get_ticker_info(&upper).await {
            Ok(summary) => {
                if let Some(info) = stock_info_from_summary(&upper, &summary) {
                    return Ok(info);
                }
                debug!(symbol = %upper, "empty Yahoo quote summary");
            }
            Err(e) => debug!(symbol = %upper, error = %e, "Yahoo quote summary failed"),
        }

        let search = self
            .connector
            .search_ticker_opt(&upper)
            .await
            .map_err(|e| api_error(format!("Failed to search for {upper}: {e}")))?;

        let fallback = StockInfo::fallback(&upper);
        Ok(match name_from_search(&upper, &search) {
            Some(name) => StockInfo { name, ..fallback },
            None => fallback,
        })
    }
}
