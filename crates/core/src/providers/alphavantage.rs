use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::date_range::DateRange;
use crate::models::price::PricePoint;
use crate::models::stock::StockInfo;
use super::traits::PriceProvider;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER: &str = "Alpha Vantage";

/// Alpha Vantage API provider for stock/equity prices and company overviews.
///
/// - **Free tier**: 25 requests/day (across ALL endpoints).
/// - **Requires**: API key (set via settings as "alphavantage").
/// - **Coverage**: 100k+ global equity symbols.
/// - **Strategy**: Fallback behind Yahoo Finance; the full daily series is
///   fetched once and trimmed to the requested window.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: String) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
        }
    }
}

// ── Alpha Vantage API response types ────────────────────────────────

#[derive(Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
}

#[derive(Deserialize)]
struct GlobalQuote {
    #[serde(rename = "01. symbol")]
    symbol: Option<String>,
}

#[derive(Deserialize)]
struct TimeSeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<HashMap<String, DailyData>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct DailyData {
    #[serde(rename = "4. close")]
    close: String,
}

#[derive(Deserialize)]
struct OverviewResponse {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Sector")]
    sector: Option<String>,
    #[serde(rename = "Industry")]
    industry: Option<String>,
    #[serde(rename = "Currency")]
    currency: Option<String>,
    #[serde(rename = "MarketCapitalization")]
    market_cap: Option<String>,
    #[serde(rename = "PERatio")]
    pe_ratio: Option<String>,
}

fn api_error(message: String) -> CoreError {
    CoreError::Api {
        provider: PROVIDER.into(),
        message,
    }
}

/// Extract `[start, end)` points from a raw daily series, sorted by date.
/// Unparseable dates or closes are skipped.
fn points_in_range(
    time_series: &HashMap<String, DailyData>,
    range: &DateRange,
) -> Vec<PricePoint> {
    let mut points: Vec<PricePoint> = time_series
        .iter()
        .filter_map(|(date_str, data)| {
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()?;
            if !range.contains(date) {
                return None;
            }
            let price: f64 = data.close.parse().ok()?;
            Some(PricePoint { date, price })
        })
        .collect();

    points.sort_by_key(|p| p.date);
    points
}

/// Alpha Vantage reports missing numbers as "None" or "-".
fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.is_empty() && s != "None")
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PriceProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_price_series(
        &self,
        symbol: &str,
        range: &DateRange,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let resp: TimeSeriesResponse = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", &symbol.to_uppercase()),
                ("outputsize", "full"),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| api_error(format!("Failed to parse time series for {symbol}: {e}")))?;

        // An unknown symbol is "no data", not a provider failure.
        if resp.error_message.is_some() {
            return Ok(Vec::new());
        }

        let time_series = resp.time_series.ok_or_else(|| {
            api_error(format!(
                "No time series data for {symbol}. API limit may be exceeded."
            ))
        })?;

        Ok(points_in_range(&time_series, range))
    }

    async fn validate_symbol(&self, symbol: &str) -> Result<Option<String>, CoreError> {
        let resp: GlobalQuoteResponse = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", &symbol.to_uppercase()),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| api_error(format!("Failed to parse quote for {symbol}: {e}")))?;

        Ok(resp.global_quote.and_then(|q| non_empty(q.symbol)))
    }

    async fn get_stock_info(&self, symbol: &str) -> Result<StockInfo, CoreError> {
        let resp: OverviewResponse = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "OVERVIEW"),
                ("symbol", &symbol.to_uppercase()),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| api_error(format!("Failed to parse overview for {symbol}: {e}")))?;

        let fallback = StockInfo::fallback(symbol);
        Ok(StockInfo {
            name: non_empty(resp.name).unwrap_or(fallback.name),
            sector: non_empty(resp.sector).unwrap_or(fallback.sector),
            industry: non_empty(resp.industry).unwrap_or(fallback.industry),
            currency: non_empty(resp.currency).unwrap_or(fallback.currency),
            market_cap: parse_number(resp.market_cap.as_deref()).unwrap_or(0.0),
            pe_ratio: parse_number(resp.pe_ratio.as_deref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn daily(close: &str) -> DailyData {
        DailyData {
            close: close.to_string(),
        }
    }

    #[test]
    fn points_in_range_is_half_open_and_sorted() {
        let mut series = HashMap::new();
        series.insert("2024-01-03".to_string(), daily("103.0"));
        series.insert("2024-01-01".to_string(), daily("101.0"));
        series.insert("2024-01-02".to_string(), daily("102.0"));
        series.insert("2024-01-04".to_string(), daily("104.0"));

        let range = DateRange::new(d(2024, 1, 1), d(2024, 1, 4)).unwrap();
        let points = points_in_range(&series, &range);

        let dates: Vec<NaiveDate> = points.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(2024, 1, 1), d(2024, 1, 2), d(2024, 1, 3)]);
        assert_eq!(points[0].price, 101.0);
    }

    #[test]
    fn points_in_range_skips_garbage() {
        let mut series = HashMap::new();
        series.insert("not-a-date".to_string(), daily("1.0"));
        series.insert("2024-01-02".to_string(), daily("n/a"));
        series.insert("2024-01-03".to_string(), daily("7.5"));

        let range = DateRange::new(d(2024, 1, 1), d(2024, 2, 1)).unwrap();
        let points = points_in_range(&series, &range);
        assert_eq!(points, vec![PricePoint::new(d(2024, 1, 3), 7.5)]);
    }

    #[test]
    fn parse_number_rejects_placeholders() {
        assert_eq!(parse_number(Some("None")), None);
        assert_eq!(parse_number(Some("-")), None);
        assert_eq!(parse_number(Some("31.5")), Some(31.5));
        assert_eq!(parse_number(None), None);
    }
}
