use crate::dto::analytics_dto::{AnalyticsReport, AnalyticsSummary, Insights};
use crate::model::transaction::{parse_date, Transaction};
use crate::repository::transaction_filter::TransactionFilter;
use crate::repository::transaction_repo::TransactionRepository;
use crate::service::aggregation::{build_report, category_breakdown, round2, summary, user_activity};
use crate::service::period::{months_back, AnalyticsPeriod, AnalyticsSummaryPeriod};
use crate::service::transaction_service::parse_end_bound;
use crate::util::error::ServiceError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// Window of `GET /api/analytics`: explicit dates win over the preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnalyticsWindow {
    Preset(AnalyticsPeriod),
    Between(DateTime<Utc>, DateTime<Utc>),
}

impl Default for AnalyticsWindow {
    fn default() -> Self {
        AnalyticsWindow::Preset(AnalyticsPeriod::default())
    }
}

fn param<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl AnalyticsWindow {
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        if let (Some(start), Some(end)) = (param(params, "startDate"), param(params, "endDate")) {
            let from = parse_date(start).ok_or_else(|| format!("Invalid startDate: {}", start))?;
            let to = parse_end_bound(end).ok_or_else(|| format!("Invalid endDate: {}", end))?;
            return Ok(AnalyticsWindow::Between(from, to));
        }
        match param(params, "period") {
            Some(raw) => Ok(AnalyticsWindow::Preset(raw.parse()?)),
            None => Ok(AnalyticsWindow::default()),
        }
    }

    pub fn filter(&self, now: DateTime<Utc>) -> TransactionFilter {
        match self {
            AnalyticsWindow::Preset(period) => TransactionFilter::new().since(months_back(now, period.months())),
            AnalyticsWindow::Between(from, to) => TransactionFilter::new().since(*from).until(*to),
        }
    }
}

pub fn summary_period_from_params(params: &HashMap<String, String>) -> Result<AnalyticsSummaryPeriod, String> {
    match param(params, "period") {
        Some(raw) => raw.parse(),
        None => Ok(AnalyticsSummaryPeriod::default()),
    }
}

#[async_trait]
pub trait AnalyticsService: Send + Sync {
    async fn get_analytics(&self, window: AnalyticsWindow) -> Result<AnalyticsReport, ServiceError>;
    async fn get_summary(&self, period: AnalyticsSummaryPeriod) -> Result<AnalyticsSummary, ServiceError>;
}

pub struct AnalyticsServiceImpl {
    pub transaction_repo: Arc<dyn TransactionRepository>,
}

impl AnalyticsServiceImpl {
    pub fn new(transaction_repo: Arc<dyn TransactionRepository>) -> Self {
        Self { transaction_repo }
    }
}

pub fn insights(transactions: &[Transaction], start: DateTime<Utc>, now: DateTime<Utc>) -> Insights {
    if transactions.is_empty() {
        return Insights { top_category: None, most_active_user: None, avg_daily_transactions: 0.0, growth_rate: 0.0 };
    }
    let millis = (now - start).num_milliseconds().max(0) as f64;
    let days = (millis / 86_400_000.0).ceil().max(1.0);
    Insights {
        top_category: category_breakdown(transactions).into_iter().next(),
        most_active_user: user_activity(transactions).into_iter().next(),
        avg_daily_transactions: round2(transactions.len() as f64 / days),
        growth_rate: 0.0,
    }
}

#[async_trait]
impl AnalyticsService for AnalyticsServiceImpl {
    #[instrument(skip(self))]
    async fn get_analytics(&self, window: AnalyticsWindow) -> Result<AnalyticsReport, ServiceError> {
        let filter = window.filter(Utc::now());
        let transactions = self.transaction_repo.find_all(&filter, None).await?;
        info!(transactions = transactions.len(), "Building analytics report");
        Ok(build_report(&transactions))
    }

    #[instrument(skip(self))]
    async fn get_summary(&self, period: AnalyticsSummaryPeriod) -> Result<AnalyticsSummary, ServiceError> {
        let now = Utc::now();
        let start = period.start(now);
        let transactions = self.transaction_repo.find_all(&TransactionFilter::new().since(start), None).await?;
        Ok(AnalyticsSummary {
            summary: summary(&transactions),
            insights: insights(&transactions, start, now),
            period: period.as_str().to_string(),
            data_points: transactions.len() as u64,
        })
    }
}
