use crate::dto::dashboard_dto::{ChangeType, DashboardChartPoint, DashboardData, MetricCard};
use crate::dto::transaction_dto::TransactionResponse;
use crate::model::transaction::Transaction;
use crate::repository::transaction_filter::{PageRequest, TransactionFilter, TransactionSort};
use crate::repository::transaction_repo::TransactionRepository;
use crate::service::aggregation::{round1, round2, Totals};
use crate::service::period::{months_back, trailing_months};
use crate::util::error::ServiceError;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::sync::Arc;
use tracing::{info, instrument};

pub const RECENT_TRANSACTIONS: u64 = 5;
const CHART_MONTHS: u32 = 12;
const SAVINGS_RATE: f64 = 0.2;

#[async_trait]
pub trait DashboardService: Send + Sync {
    async fn get_dashboard(&self) -> Result<DashboardData, ServiceError>;
}

pub struct DashboardServiceImpl {
    pub transaction_repo: Arc<dyn TransactionRepository>,
}

impl DashboardServiceImpl {
    pub fn new(transaction_repo: Arc<dyn TransactionRepository>) -> Self {
        Self { transaction_repo }
    }
}

fn savings(balance: f64) -> f64 {
    if balance > 0.0 {
        balance * SAVINGS_RATE
    } else {
        0.0
    }
}

/// Percentage change against `previous`, 0 when there is nothing to compare with.
fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous.abs() * 100.0
    }
}

fn card(title: &str, icon: &str, amount: f64, change: f64) -> MetricCard {
    MetricCard {
        title: title.to_string(),
        amount: round2(amount),
        icon: icon.to_string(),
        change: round1(change),
        change_type: if change >= 0.0 { ChangeType::Increase } else { ChangeType::Decrease },
    }
}

pub fn metric_cards(transactions: &[Transaction], now: DateTime<Utc>) -> Vec<MetricCard> {
    let overall = Totals::of(transactions);
    let balance = overall.net();

    let current_start = months_back(now, 0);
    let previous_start = months_back(now, 1);
    let mut current = Totals::default();
    let mut previous = Totals::default();
    for tx in transactions {
        match tx.timestamp() {
            Some(ts) if ts >= current_start => current.add(tx),
            Some(ts) if ts >= previous_start => previous.add(tx),
            _ => {}
        }
    }

    let revenue_change = percent_change(current.revenue, previous.revenue);
    let expense_change = percent_change(current.expenses, previous.expenses);
    let balance_change = percent_change(current.net(), previous.net());
    let savings_change = percent_change(savings(current.net()), savings(previous.net()));

    // Growing expenses are the bad direction, so the card shows the size of
    // the move and flags anything that is not growth as a decrease.
    let mut expenses = card("Expenses", "CreditCard", overall.expenses, expense_change.abs());
    expenses.change_type = if expense_change <= 0.0 { ChangeType::Decrease } else { ChangeType::Increase };

    vec![
        card("Balance", "Wallet", balance, balance_change),
        card("Revenue", "TrendingUp", overall.revenue, revenue_change),
        expenses,
        card("Savings", "PiggyBank", savings(balance), savings_change),
    ]
}

/// Income and expenses of the last twelve months, oldest first.
pub fn monthly_chart(transactions: &[Transaction], now: DateTime<Utc>) -> Vec<DashboardChartPoint> {
    let months = trailing_months(now, CHART_MONTHS);
    let mut totals = vec![Totals::default(); months.len()];
    for tx in transactions {
        let Some(ts) = tx.timestamp() else { continue };
        if let Some(i) = months.iter().position(|m| *m == (ts.year(), ts.month())) {
            totals[i].add(tx);
        }
    }
    months
        .iter()
        .zip(totals)
        .map(|((year, month), t)| DashboardChartPoint {
            month: NaiveDate::from_ymd_opt(*year, *month, 1)
                .map(|d| d.format("%b").to_string())
                .unwrap_or_default(),
            income: (t.revenue + 0.5).floor(),
            expenses: (t.expenses + 0.5).floor(),
        })
        .collect()
}

pub fn recent_rows(recent: &[Transaction]) -> Vec<TransactionResponse> {
    recent
        .iter()
        .map(|tx| {
            let mut row = TransactionResponse::from(tx);
            row.amount = tx.signed_amount();
            row
        })
        .collect()
}

pub fn build_dashboard(transactions: &[Transaction], recent: &[Transaction], now: DateTime<Utc>) -> DashboardData {
    DashboardData {
        metrics: metric_cards(transactions, now),
        chart_data: monthly_chart(transactions, now),
        recent_transactions: recent_rows(recent),
    }
}

#[async_trait]
impl DashboardService for DashboardServiceImpl {
    #[instrument(skip(self))]
    async fn get_dashboard(&self) -> Result<DashboardData, ServiceError> {
        let everything = TransactionFilter::new();
        let transactions = self.transaction_repo.find_all(&everything, None).await?;
        let recent = self
            .transaction_repo
            .find_page(&everything, &TransactionSort::default(), PageRequest { page: 1, limit: RECENT_TRANSACTIONS })
            .await?;
        info!(transactions = transactions.len(), "Building dashboard");
        Ok(build_dashboard(&transactions, &recent, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tx(amount: f64, category: &str, date: &str) -> Transaction {
        Transaction {
            id: None,
            user_id: "user_001".to_string(),
            user_name: Some("Jane".to_string()),
            amount,
            category: category.to_string(),
            status: None,
            date: date.to_string(),
            avatar: None,
            direction: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_dashboard_has_zero_cards() {
        let data = build_dashboard(&[], &[], now());
        assert_eq!(data.metrics.len(), 4);
        assert!(data.metrics.iter().all(|m| m.amount == 0.0 && m.change == 0.0));
        assert_eq!(data.metrics[2].change_type, ChangeType::Decrease);
        assert_eq!(data.metrics[0].change_type, ChangeType::Increase);
        assert_eq!(data.chart_data.len(), 12);
        assert!(data.recent_transactions.is_empty());
    }

    #[test]
    fn test_month_over_month_changes() {
        let txs = vec![
            tx(1000.0, "Revenue", "2024-02-10T00:00:00.000Z"),
            tx(400.0, "Rent", "2024-02-11T00:00:00.000Z"),
            tx(1500.0, "Revenue", "2024-03-02T00:00:00.000Z"),
            tx(300.0, "Rent", "2024-03-03T00:00:00.000Z"),
            tx(100.0, "Food", "2023-01-01T00:00:00.000Z"),
        ];
        let cards = metric_cards(&txs, now());
        let balance = &cards[0];
        assert_eq!(balance.amount, 1700.0);
        assert_eq!(balance.change, 100.0);
        assert_eq!(balance.change_type, ChangeType::Increase);

        assert_eq!(cards[1].amount, 2500.0);
        assert_eq!(cards[1].change, 50.0);

        let expenses = &cards[2];
        assert_eq!(expenses.amount, 800.0);
        assert_eq!(expenses.change, 25.0);
        assert_eq!(expenses.change_type, ChangeType::Decrease);

        let savings = &cards[3];
        assert_eq!(savings.amount, 340.0);
        assert_eq!(savings.change, 100.0);
    }

    #[test]
    fn test_chart_rounds_to_whole_units_and_keys_by_year() {
        let txs = vec![
            tx(10.4, "Revenue", "2024-03-01T00:00:00.000Z"),
            tx(0.6, "Food", "2024-03-01T00:00:00.000Z"),
            tx(999.0, "Food", "2023-03-01T00:00:00.000Z"),
        ];
        let chart = monthly_chart(&txs, now());
        assert_eq!(chart.first().unwrap().month, "Apr");
        let last = chart.last().unwrap();
        assert_eq!(last.month, "Mar");
        assert_eq!(last.income, 10.0);
        assert_eq!(last.expenses, 1.0);
        assert_eq!(chart.iter().map(|p| p.expenses).sum::<f64>(), 1.0);
    }

    #[test]
    fn test_recent_rows_are_signed() {
        let rows = recent_rows(&[tx(50.0, "Food", "2024-03-01"), tx(70.0, "Revenue", "2024-03-01")]);
        assert_eq!(rows[0].amount, -50.0);
        assert_eq!(rows[1].amount, 70.0);
    }
}
