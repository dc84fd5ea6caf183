use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Half-open analysis window `[start, end)` used when fetching prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range. `start` must be strictly before `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start >= end {
            return Err(CoreError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls inside `[start, end)`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} – {}",
            self.start.format("%d/%m/%Y"),
            self.end.format("%d/%m/%Y")
        )
    }
}

/// Quick-pick analysis periods. Every preset ends yesterday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateRangePreset {
    LastYear,
    LastSixMonths,
    LastThreeMonths,
    YearToDate,
    LastFiveYears,
}

impl DateRangePreset {
    pub const ALL: [DateRangePreset; 5] = [
        DateRangePreset::LastYear,
        DateRangePreset::LastSixMonths,
        DateRangePreset::LastThreeMonths,
        DateRangePreset::YearToDate,
        DateRangePreset::LastFiveYears,
    ];

    /// Resolve the preset against `today`.
    pub fn resolve(&self, today: NaiveDate) -> Result<DateRange, CoreError> {
        let end = today - Duration::days(1);
        let start = match self {
            DateRangePreset::LastYear => today - Duration::days(365),
            DateRangePreset::LastSixMonths => today - Duration::days(180),
            DateRangePreset::LastThreeMonths => today - Duration::days(90),
            DateRangePreset::LastFiveYears => today - Duration::days(365 * 5),
            DateRangePreset::YearToDate => NaiveDate::from_ymd_opt(today.year(), 1, 1)
                .ok_or_else(|| CoreError::ValidationError(format!("no January 1st for {today}")))?,
        };
        // YTD on January 1st or 2nd has no full day before `end` and is rejected.
        DateRange::new(start, end)
    }
}

impl std::fmt::Display for DateRangePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateRangePreset::LastYear => write!(f, "Last year"),
            DateRangePreset::LastSixMonths => write!(f, "Last 6 months"),
            DateRangePreset::LastThreeMonths => write!(f, "Last 3 months"),
            DateRangePreset::YearToDate => write!(f, "YTD"),
            DateRangePreset::LastFiveYears => write!(f, "Last 5 years"),
        }
    }
}
