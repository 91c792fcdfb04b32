//! Calendar arithmetic (UTC) and the period selectors accepted by the
//! chart and analytics endpoints.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::str::FromStr;

/// Midnight UTC on the first day of the given month. `month` may be out of
/// `1..=12`; it is normalised into the right year.
pub fn month_start(year: i32, month: i32) -> DateTime<Utc> {
    let index = year * 12 + (month - 1);
    let (y, m) = (index.div_euclid(12), index.rem_euclid(12) + 1);
    NaiveDate::from_ymd_opt(y, m as u32, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// First day of the month `n` months before the month of `now`.
pub fn months_back(now: DateTime<Utc>, n: i32) -> DateTime<Utc> {
    month_start(now.year(), now.month() as i32 - n)
}

/// `(year, month)` of each of the last `count` months, oldest first, ending
/// with the month of `now`.
pub fn trailing_months(now: DateTime<Utc>, count: u32) -> Vec<(i32, u32)> {
    (0..count as i32)
        .rev()
        .map(|i| {
            let start = months_back(now, i);
            (start.year(), start.month())
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartPeriod {
    #[default]
    Monthly,
    Weekly,
    Yearly,
}

impl FromStr for ChartPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(ChartPeriod::Monthly),
            "weekly" => Ok(ChartPeriod::Weekly),
            "yearly" => Ok(ChartPeriod::Yearly),
            other => Err(format!("Invalid period: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartSummaryPeriod {
    #[default]
    CurrentMonth,
    LastMonth,
    CurrentYear,
    All,
}

impl ChartSummaryPeriod {
    /// Inclusive lower and upper bounds; `None` leaves that side open.
    pub fn bounds(&self, now: DateTime<Utc>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        match self {
            ChartSummaryPeriod::CurrentMonth => (Some(months_back(now, 0)), None),
            ChartSummaryPeriod::LastMonth => {
                (Some(months_back(now, 1)), Some(months_back(now, 0) - Duration::milliseconds(1)))
            }
            ChartSummaryPeriod::CurrentYear => (Some(month_start(now.year(), 1)), None),
            ChartSummaryPeriod::All => (None, None),
        }
    }
}

impl FromStr for ChartSummaryPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current_month" => Ok(ChartSummaryPeriod::CurrentMonth),
            "last_month" => Ok(ChartSummaryPeriod::LastMonth),
            "current_year" => Ok(ChartSummaryPeriod::CurrentYear),
            "all" => Ok(ChartSummaryPeriod::All),
            other => Err(format!("Invalid period: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalyticsPeriod {
    ThreeMonths,
    #[default]
    SixMonths,
    OneYear,
}

impl AnalyticsPeriod {
    pub fn months(&self) -> i32 {
        match self {
            AnalyticsPeriod::ThreeMonths => 3,
            AnalyticsPeriod::SixMonths => 6,
            AnalyticsPeriod::OneYear => 12,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsPeriod::ThreeMonths => "3months",
            AnalyticsPeriod::SixMonths => "6months",
            AnalyticsPeriod::OneYear => "1year",
        }
    }
}

impl FromStr for AnalyticsPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "3months" => Ok(AnalyticsPeriod::ThreeMonths),
            "6months" => Ok(AnalyticsPeriod::SixMonths),
            "1year" => Ok(AnalyticsPeriod::OneYear),
            other => Err(format!("Invalid period: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalyticsSummaryPeriod {
    ThirtyDays,
    NinetyDays,
    SixMonths,
    #[default]
    OneYear,
}

impl AnalyticsSummaryPeriod {
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            AnalyticsSummaryPeriod::ThirtyDays => now - Duration::days(30),
            AnalyticsSummaryPeriod::NinetyDays => now - Duration::days(90),
            AnalyticsSummaryPeriod::SixMonths => months_back(now, 6),
            AnalyticsSummaryPeriod::OneYear => months_back(now, 12),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsSummaryPeriod::ThirtyDays => "30days",
            AnalyticsSummaryPeriod::NinetyDays => "90days",
            AnalyticsSummaryPeriod::SixMonths => "6months",
            AnalyticsSummaryPeriod::OneYear => "1year",
        }
    }
}

impl FromStr for AnalyticsSummaryPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "30days" => Ok(AnalyticsSummaryPeriod::ThirtyDays),
            "90days" => Ok(AnalyticsSummaryPeriod::NinetyDays),
            "6months" => Ok(AnalyticsSummaryPeriod::SixMonths),
            "1year" => Ok(AnalyticsSummaryPeriod::OneYear),
            other => Err(format!("Invalid period: {}", other)),
        }
    }
}
