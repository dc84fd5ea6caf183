use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::CoreError;

use super::date_range::DateRange;
use super::stock::StockInfo;

/// A single price data point (date → closing price).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Daily closing-price history of one symbol.
///
/// Guaranteed non-empty, with strictly increasing dates and positive,
/// finite prices. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from points that must already satisfy every invariant.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, CoreError> {
        if points.is_empty() {
            return Err(CoreError::InvalidInput("price series is empty".into()));
        }
        for window in points.windows(2) {
            if window[1].date <= window[0].date {
                return Err(CoreError::InvalidInput(format!(
                    "price series dates must be strictly increasing ({} follows {})",
                    window[1].date, window[0].date
                )));
            }
        }
        if let Some(bad) = points.iter().find(|p| !p.price.is_finite() || p.price <= 0.0) {
            return Err(CoreError::InvalidInput(format!(
                "price on {} must be positive and finite, got {}",
                bad.date, bad.price
            )));
        }
        Ok(Self { points })
    }

    /// Build a series from raw provider output: sorts by date and keeps the
    /// last quote for a repeated date. Still rejects empty input and bad prices.
    pub fn from_unsorted(mut points: Vec<PricePoint>) -> Result<Self, CoreError> {
        points.sort_by_key(|p| p.date);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }
        Self::new(deduped)
    }

    /// Convenience constructor for consecutive calendar days starting at `start`.
    pub fn from_closes(start: NaiveDate, closes: &[f64]) -> Result<Self, CoreError> {
        let points = closes
            .iter()
            .zip(start.iter_days())
            .map(|(&price, date)| PricePoint { date, price })
            .collect();
        Self::new(points)
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Closing prices in date order.
    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.price)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> &PricePoint {
        &self.points[0]
    }

    pub fn last(&self) -> &PricePoint {
        &self.points[self.points.len() - 1]
    }
}

/// Cache key: (SYMBOL, start, end) of a fetched series.
pub type PriceCacheKey = (String, NaiveDate, NaiveDate);

fn is_fresh(fetched_at: DateTime<Utc>, now: DateTime<Utc>, ttl_secs: u64) -> bool {
    let age = (now - fetched_at).num_seconds();
    age >= 0 && (age as u64) < ttl_secs
}

#[derive(Debug, Clone)]
struct CachedSeries {
    series: PriceSeries,
    fetched_at: DateTime<Utc>,
}

/// Time-bounded cache of fetched price series.
///
/// Sits in front of the price providers only; the metrics and aggregation
/// code never touches it. An entry older than `ttl_secs` is treated as
/// absent and replaced on the next fetch.
#[derive(Debug, Clone)]
pub struct PriceCache {
    entries: HashMap<PriceCacheKey, CachedSeries>,
    ttl_secs: u64,
}

impl PriceCache {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            entries: HashMap::new(),
            ttl_secs,
        }
    }

    fn key(symbol: &str, range: &DateRange) -> PriceCacheKey {
        (symbol.to_uppercase(), range.start(), range.end())
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    pub fn set_ttl_secs(&mut self, ttl_secs: u64) {
        self.ttl_secs = ttl_secs;
    }

    /// Get a cached series if it was fetched less than `ttl_secs` before `now`.
    pub fn get(&self, symbol: &str, range: &DateRange, now: DateTime<Utc>) -> Option<&PriceSeries> {
        let entry = self.entries.get(&Self::key(symbol, range))?;
        is_fresh(entry.fetched_at, now, self.ttl_secs).then_some(&entry.series)
    }

    /// Insert or replace the series for `(symbol, range)`.
    pub fn insert(&mut self, symbol: &str, range: &DateRange, series: PriceSeries, now: DateTime<Utc>) {
        self.entries.insert(
            Self::key(symbol, range),
            CachedSeries {
                series,
                fetched_at: now,
            },
        );
    }

    /// Drop every expired entry. Returns the number removed.
    pub fn prune_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl_secs;
        self.entries.retain(|_, entry| is_fresh(entry.fetched_at, now, ttl));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new(super::settings::DEFAULT_CACHE_TTL_SECS)
    }
}

#[derive(Debug, Clone)]
struct CachedInfo {
    info: StockInfo,
    fetched_at: DateTime<Utc>,
}

/// Time-bounded cache of company metadata, keyed by uppercased symbol.
/// Expiry follows the same rule as [`PriceCache`].
#[derive(Debug, Clone)]
pub struct StockInfoCache {
    entries: HashMap<String, CachedInfo>,
    ttl_secs: u64,
}

impl StockInfoCache {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            entries: HashMap::new(),
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    pub fn set_ttl_secs(&mut self, ttl_secs: u64) {
        self.ttl_secs = ttl_secs;
    }

    pub fn get(&self, symbol: &str, now: DateTime<Utc>) -> Option<&StockInfo> {
        let entry = self.entries.get(&symbol.to_uppercase())?;
        is_fresh(entry.fetched_at, now, self.ttl_secs).then_some(&entry.info)
    }

    pub fn insert(&mut self, symbol: &str, info: StockInfo, now: DateTime<Utc>) {
        self.entries.insert(
            symbol.to_uppercase(),
            CachedInfo {
                info,
                fetched_at: now,
            },
        );
    }

    /// Drop every expired entry. Returns the number removed.
    pub fn prune_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl_secs;
        self.entries.retain(|_, entry| is_fresh(entry.fetched_at, now, ttl));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for StockInfoCache {
    fn default() -> Self {
        Self::new(super::settings::DEFAULT_CACHE_TTL_SECS)
    }
}
