use crate::dto::chart_dto::{ChartPoint, ChartSeries, ChartSummary, TopCategory};
use crate::model::transaction::Transaction;
use crate::repository::transaction_filter::TransactionFilter;
use crate::repository::transaction_repo::TransactionRepository;
use crate::service::aggregation::{category_breakdown, round2, Totals};
use crate::service::period::{months_back, trailing_months, ChartPeriod, ChartSummaryPeriod};
use crate::util::error::ServiceError;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{info, instrument};

pub const DEFAULT_MONTHS: u32 = 12;
pub const MAX_MONTHS: u32 = 24;
const WEEKS: i64 = 12;

/// Parsed `GET /api/charts/data` query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartQuery {
    pub period: ChartPeriod,
    pub months: u32,
}

impl Default for ChartQuery {
    fn default() -> Self {
        ChartQuery { period: ChartPeriod::default(), months: DEFAULT_MONTHS }
    }
}

impl ChartQuery {
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let period = match params.get("period").map(|p| p.trim()).filter(|p| !p.is_empty()) {
            Some(raw) => raw.parse()?,
            None => ChartPeriod::default(),
        };
        let months = match params.get("months").map(|m| m.trim()).filter(|m| !m.is_empty()) {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|m| (1..=MAX_MONTHS).contains(m))
                .ok_or_else(|| format!("months must be between 1 and {}", MAX_MONTHS))?,
            None => DEFAULT_MONTHS,
        };
        Ok(ChartQuery { period, months })
    }
}

#[async_trait]
pub trait ChartService: Send + Sync {
    async fn get_chart_data(&self, query: ChartQuery) -> Result<ChartSeries, ServiceError>;
    async fn get_chart_summary(&self, period: ChartSummaryPeriod) -> Result<ChartSummary, ServiceError>;
}

pub struct ChartServiceImpl {
    pub transaction_repo: Arc<dyn TransactionRepository>,
}

impl ChartServiceImpl {
    pub fn new(transaction_repo: Arc<dyn TransactionRepository>) -> Self {
        Self { transaction_repo }
    }
}

fn point(label: String, totals: &Totals) -> ChartPoint {
    ChartPoint {
        month: label,
        income: round2(totals.revenue),
        expenses: round2(totals.expenses),
        net_income: round2(totals.net()),
        transaction_count: totals.count,
    }
}

fn short_month(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b").to_string())
        .unwrap_or_default()
}

/// One zero-initialised bucket per month of the window, oldest first.
pub fn monthly_series(transactions: &[Transaction], months: u32, now: DateTime<Utc>) -> Vec<ChartPoint> {
    let keys = trailing_months(now, months);
    let mut totals = vec![Totals::default(); keys.len()];
    for tx in transactions {
        let Some(ts) = tx.timestamp() else { continue };
        if let Some(i) = keys.iter().position(|k| *k == (ts.year(), ts.month())) {
            totals[i].add(tx);
        }
    }
    keys.iter()
        .zip(totals.iter())
        .map(|((year, month), t)| point(short_month(*year, *month), t))
        .collect()
}

/// Twelve rolling seven-day buckets ending at `now`, labelled by their first day.
pub fn weekly_series(transactions: &[Transaction], now: DateTime<Utc>) -> Vec<ChartPoint> {
    let starts: Vec<DateTime<Utc>> = (1..=WEEKS).rev().map(|i| now - Duration::days(7 * i)).collect();
    let mut totals = vec![Totals::default(); starts.len()];
    for tx in transactions {
        let Some(ts) = tx.timestamp() else { continue };
        if ts < starts[0] || ts >= now {
            continue;
        }
        let index = ((ts - starts[0]).num_days() / 7) as usize;
        if let Some(bucket) = totals.get_mut(index) {
            bucket.add(tx);
        }
    }
    starts
        .iter()
        .zip(totals.iter())
        .map(|(start, t)| point(start.format("%b %d").to_string(), t))
        .collect()
}

/// One bucket per calendar year present, ascending.
pub fn yearly_series(transactions: &[Transaction]) -> Vec<ChartPoint> {
    let mut years: BTreeMap<i32, Totals> = BTreeMap::new();
    for tx in transactions {
        if let Some(ts) = tx.timestamp() {
            years.entry(ts.year()).or_default().add(tx);
        }
    }
    years.iter().map(|(year, t)| point(year.to_string(), t)).collect()
}

pub fn summarize(transactions: &[Transaction]) -> ChartSummary {
    let totals = Totals::of(transactions);
    let avg = if totals.count > 0 { totals.volume() / totals.count as f64 } else { 0.0 };
    let top_category = category_breakdown(transactions)
        .into_iter()
        .next()
        .map(|c| TopCategory { name: c.category, amount: c.amount });
    ChartSummary {
        total_income: round2(totals.revenue),
        total_expenses: round2(totals.expenses),
        net_income: round2(totals.net()),
        transaction_count: totals.count,
        avg_transaction_amount: round2(avg),
        top_category,
        growth_rate: 0.0,
    }
}

#[async_trait]
impl ChartService for ChartServiceImpl {
    #[instrument(skip(self))]
    async fn get_chart_data(&self, query: ChartQuery) -> Result<ChartSeries, ServiceError> {
        let now = Utc::now();
        let filter = TransactionFilter::new().since(months_back(now, query.months as i32 - 1));
        let transactions = self.transaction_repo.find_all(&filter, None).await?;
        info!(transactions = transactions.len(), "Building chart series");

        if transactions.is_empty() {
            return Ok(ChartSeries { points: monthly_series(&[], query.months, now), has_data: false });
        }
        let points = match query.period {
            ChartPeriod::Monthly => monthly_series(&transactions, query.months, now),
            ChartPeriod::Weekly => weekly_series(&transactions, now),
            ChartPeriod::Yearly => yearly_series(&transactions),
        };
        Ok(ChartSeries { points, has_data: true })
    }

    #[instrument(skip(self))]
    async fn get_chart_summary(&self, period: ChartSummaryPeriod) -> Result<ChartSummary, ServiceError> {
        let mut filter = TransactionFilter::new();
        let (from, to) = period.bounds(Utc::now());
        if let Some(from) = from {
            filter = filter.since(from);
        }
        if let Some(to) = to {
            filter = filter.until(to);
        }
        let transactions = self.transaction_repo.find_all(&filter, None).await?;
        Ok(summarize(&transactions))
    }
}
