//! Reporting folds over a fetched transaction list.
//!
//! Every function is a single pass keyed by month, category, status, user,
//! amount bucket or day. Groups keep first-seen order so ties in the final
//! sorts are deterministic. Amounts are magnitudes; the direction decides
//! whether a row counts as revenue or expense.

use crate::dto::analytics_dto::{
    AmountBucket, AnalyticsReport, CategoryBreakdown, DailyPoint, MonthlyTrend, PerformanceMetric,
    StatusDistribution, Summary, UserActivity,
};
use crate::model::transaction::Transaction;
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use std::hash::Hash;

pub const TOP_USERS: usize = 15;
pub const TIME_SERIES_DAYS: usize = 60;
pub const PERFORMANCE_MONTHS: usize = 12;

/// Rounds half up to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// Rounds half up to one decimal.
pub fn round1(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// `part / total` as a percentage with two decimals; 0 when `total` is 0.
pub fn percentage(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    (part / total * 10_000.0 + 0.5).floor() / 100.0
}

/// Revenue and expense sums of a slice.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub revenue: f64,
    pub expenses: f64,
    pub count: u64,
}

impl Totals {
    pub fn add(&mut self, tx: &Transaction) {
        if tx.is_income() {
            self.revenue += tx.magnitude();
        } else {
            self.expenses += tx.magnitude();
        }
        self.count += 1;
    }

    pub fn of<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut totals = Totals::default();
        for tx in transactions {
            totals.add(tx);
        }
        totals
    }

    pub fn volume(&self) -> f64 {
        self.revenue + self.expenses
    }

    pub fn net(&self) -> f64 {
        self.revenue - self.expenses
    }
}

/// Groups in first-seen order; rows whose key is `None` are skipped.
fn fold_grouped<K, A>(
    transactions: &[Transaction],
    key: impl Fn(&Transaction) -> Option<K>,
    mut step: impl FnMut(&mut A, &Transaction),
) -> Vec<(K, A)>
where
    K: Eq + Hash + Clone,
    A: Default,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, A)> = Vec::new();
    for tx in transactions {
        let Some(k) = key(tx) else { continue };
        let slot = *index.entry(k.clone()).or_insert_with(|| {
            groups.push((k, A::default()));
            groups.len() - 1
        });
        step(&mut groups[slot].1, tx);
    }
    groups
}

fn month_of(tx: &Transaction) -> Option<(i32, u32)> {
    tx.timestamp().map(|dt| (dt.year(), dt.month()))
}

/// `Mar 2024`
pub fn month_label((year, month): (i32, u32)) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_default()
}

#[derive(Default)]
struct MonthAcc {
    totals: Totals,
    revenue_count: u64,
    expense_count: u64,
    completed: u64,
}

fn fold_months(transactions: &[Transaction]) -> Vec<((i32, u32), MonthAcc)> {
    let mut months = fold_grouped(transactions, month_of, |acc: &mut MonthAcc, tx| {
        acc.totals.add(tx);
        if tx.is_income() {
            acc.revenue_count += 1;
        } else {
            acc.expense_count += 1;
        }
        if matches!(tx.status.as_deref(), Some("Completed") | Some("Paid")) {
            acc.completed += 1;
        }
    });
    months.sort_by_key(|(key, _)| *key);
    months
}

pub fn monthly_trends(transactions: &[Transaction]) -> Vec<MonthlyTrend> {
    fold_months(transactions)
        .into_iter()
        .map(|(key, acc)| MonthlyTrend {
            month: month_label(key),
            revenue: round2(acc.totals.revenue),
            expense: round2(acc.totals.expenses),
            net: round2(acc.totals.net()),
            transactions: acc.totals.count,
            revenue_transactions: acc.revenue_count,
            expense_transactions: acc.expense_count,
            avg_transaction_size: round2(acc.totals.volume() / acc.totals.count as f64),
        })
        .collect()
}

#[derive(Default)]
struct SumCount {
    amount: f64,
    count: u64,
}

pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryBreakdown> {
    let total: f64 = transactions.iter().map(Transaction::magnitude).sum();
    let groups = fold_grouped(
        transactions,
        |tx| Some(tx.category_or_default().to_string()),
        |acc: &mut SumCount, tx| {
            acc.amount += tx.magnitude();
            acc.count += 1;
        },
    );
    let mut breakdown: Vec<CategoryBreakdown> = groups
        .into_iter()
        .map(|(category, acc)| CategoryBreakdown {
            category,
            amount: round2(acc.amount),
            count: acc.count,
            avg_amount: round2(acc.amount / acc.count as f64),
            percentage: percentage(acc.amount, total),
        })
        .collect();
    breakdown.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    breakdown
}

pub fn status_distribution(transactions: &[Transaction]) -> Vec<StatusDistribution> {
    let total = transactions.len() as f64;
    let groups = fold_grouped(
        transactions,
        |tx| Some(tx.status_or_default().to_string()),
        |count: &mut u64, _| *count += 1,
    );
    let mut distribution: Vec<StatusDistribution> = groups
        .into_iter()
        .map(|(status, count)| StatusDistribution { status, count, percentage: percentage(count as f64, total) })
        .collect();
    distribution.sort_by(|a, b| b.count.cmp(&a.count));
    distribution
}

#[derive(Default)]
struct UserAcc {
    totals: Totals,
    last_transaction: Option<String>,
}

pub fn user_activity(transactions: &[Transaction]) -> Vec<UserActivity> {
    let groups = fold_grouped(
        transactions,
        |tx| Some(if tx.user_id.is_empty() { "Unknown".to_string() } else { tx.user_id.clone() }),
        |acc: &mut UserAcc, tx| {
            acc.totals.add(tx);
            match acc.last_transaction {
                None => acc.last_transaction = Some(tx.date.clone()),
                Some(ref last) => {
                    let newer = match (tx.timestamp(), crate::model::transaction::parse_date(last)) {
                        (Some(candidate), Some(current)) => candidate > current,
                        _ => false,
                    };
                    if newer {
                        acc.last_transaction = Some(tx.date.clone());
                    }
                }
            }
        },
    );
    let mut activity: Vec<UserActivity> = groups
        .into_iter()
        .map(|(user, acc)| UserActivity {
            user,
            transactions: acc.totals.count,
            total_amount: round2(acc.totals.volume()),
            revenue: round2(acc.totals.revenue),
            expenses: round2(acc.totals.expenses),
            avg_amount: round2(acc.totals.volume() / acc.totals.count as f64),
            last_transaction: acc.last_transaction.unwrap_or_default(),
            net_value: round2(acc.totals.net()),
        })
        .collect();
    activity.sort_by(|a, b| b.total_amount.total_cmp(&a.total_amount));
    activity.truncate(TOP_USERS);
    activity
}

/// Lower bound inclusive, upper bound exclusive.
const AMOUNT_BUCKETS: [(f64, f64, &str); 6] = [
    (0.0, 100.0, "$0-$100"),
    (100.0, 500.0, "$100-$500"),
    (500.0, 1_000.0, "$500-$1K"),
    (1_000.0, 5_000.0, "$1K-$5K"),
    (5_000.0, 10_000.0, "$5K-$10K"),
    (10_000.0, f64::INFINITY, "$10K+"),
];

pub fn amount_distribution(transactions: &[Transaction]) -> Vec<AmountBucket> {
    let mut buckets = [(0u64, 0f64); AMOUNT_BUCKETS.len()];
    for tx in transactions {
        let amount = tx.magnitude();
        if let Some(i) = AMOUNT_BUCKETS.iter().position(|(min, max, _)| amount >= *min && amount < *max) {
            buckets[i].0 += 1;
            buckets[i].1 += amount;
        }
    }
    let total = transactions.len() as f64;
    AMOUNT_BUCKETS
        .iter()
        .zip(buckets)
        .filter(|(_, (count, _))| *count > 0)
        .map(|((_, _, label), (count, sum))| AmountBucket {
            range: label.to_string(),
            count,
            total_amount: round2(sum),
            percentage: percentage(count as f64, total),
            avg_amount: round2(sum / count as f64),
        })
        .collect()
}

pub fn time_series(transactions: &[Transaction]) -> Vec<DailyPoint> {
    let mut days = fold_grouped(
        transactions,
        |tx| tx.timestamp().map(|dt| dt.date_naive()),
        |acc: &mut Totals, tx| acc.add(tx),
    );
    days.sort_by_key(|(day, _)| *day);
    let skip = days.len().saturating_sub(TIME_SERIES_DAYS);
    days.into_iter()
        .skip(skip)
        .map(|(day, acc)| DailyPoint {
            date: day.format("%Y-%m-%d").to_string(),
            amount: round2(acc.volume()),
            count: acc.count,
            revenue: round2(acc.revenue),
            expenses: round2(acc.expenses),
            avg_amount: round2(acc.volume() / acc.count as f64),
            net: round2(acc.net()),
        })
        .collect()
}

pub fn performance_metrics(transactions: &[Transaction]) -> Vec<PerformanceMetric> {
    let months = fold_months(transactions);
    let skip = months.len().saturating_sub(PERFORMANCE_MONTHS);
    months
        .into_iter()
        .skip(skip)
        .map(|(key, acc)| {
            let t = acc.totals;
            let profit = t.net();
            let profit_margin = if t.revenue > 0.0 { profit / t.revenue * 100.0 } else { 0.0 };
            let completion_rate = acc.completed as f64 / t.count as f64 * 100.0;
            let efficiency = if t.volume() > 0.0 { t.revenue / t.volume() * 100.0 } else { 0.0 };
            PerformanceMetric {
                month: month_label(key),
                revenue: round2(t.revenue),
                expenses: round2(t.expenses),
                profit: round2(profit),
                profit_margin: round2(profit_margin),
                completion_rate: round2(completion_rate),
                efficiency: round2(efficiency),
                transactions: t.count,
            }
        })
        .collect()
}

pub fn summary(transactions: &[Transaction]) -> Summary {
    let totals = Totals::of(transactions);
    let avg_transaction = if totals.count > 0 { round2(totals.volume() / totals.count as f64) } else { 0.0 };
    let profit_margin = if totals.revenue > 0.0 { percentage(totals.net(), totals.revenue) } else { 0.0 };
    Summary {
        total_revenue: round2(totals.revenue),
        total_expenses: round2(totals.expenses),
        net_profit: round2(totals.net()),
        avg_transaction,
        total_transactions: totals.count,
        profit_margin,
    }
}

pub fn build_report(transactions: &[Transaction]) -> AnalyticsReport {
    AnalyticsReport {
        monthly_trends: monthly_trends(transactions),
        category_breakdown: category_breakdown(transactions),
        status_distribution: status_distribution(transactions),
        user_activity: user_activity(transactions),
        amount_distribution: amount_distribution(transactions),
        time_series_data: time_series(transactions),
        performance_metrics: performance_metrics(transactions),
        summary: summary(transactions),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(user: &str, amount: f64, category: &str, status: Option<&str>, date: &str) -> Transaction {
        Transaction {
            id: None,
            user_id: user.to_string(),
            user_name: None,
            amount,
            category: category.to_string(),
            status: status.map(str::to_string),
            date: date.to_string(),
            avatar: None,
            direction: None,
        }
    }

    #[test]
    fn test_rounding_is_half_up() {
        assert_eq!(round2(2.125), 2.13);
        assert_eq!(round2(-2.5), -2.5);
        assert_eq!(round1(12.25), 12.3);
        assert_eq!(percentage(1.0, 3.0), 33.33);
        assert_eq!(percentage(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_summary_of_revenue_and_expense() {
        let txs = vec![
            tx("u1", 100.0, "Revenue", None, "2024-01-01T00:00:00.000Z"),
            tx("u1", 50.0, "Food", None, "2024-01-02T00:00:00.000Z"),
        ];
        let s = summary(&txs);
        assert_eq!(s.total_revenue, 100.0);
        assert_eq!(s.total_expenses, 50.0);
        assert_eq!(s.net_profit, 50.0);
        assert_eq!(s.total_transactions, 2);
        assert_eq!(s.avg_transaction, 75.0);
        assert_eq!(s.profit_margin, 50.0);
    }

    #[test]
    fn test_empty_summary_is_zero() {
        assert_eq!(summary(&[]), Summary::default());
        assert_eq!(build_report(&[]), AnalyticsReport::default());
    }

    #[test]
    fn test_monthly_trends_are_chronological() {
        let txs = vec![
            tx("u1", 10.0, "Food", None, "2024-03-10T00:00:00.000Z"),
            tx("u1", 30.0, "Revenue", None, "2023-12-31T23:59:59.000Z"),
            tx("u1", 20.0, "Rent", None, "2024-03-01T00:00:00.000Z"),
            tx("u1", 5.0, "Food", None, "garbage"),
        ];
        let trends = monthly_trends(&txs);
        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].month, "Dec 2023");
        assert_eq!(trends[0].revenue, 30.0);
        assert_eq!(trends[1].month, "Mar 2024");
        assert_eq!(trends[1].expense, 30.0);
        assert_eq!(trends[1].net, -30.0);
        assert_eq!(trends[1].expense_transactions, 2);
        assert_eq!(trends[1].avg_transaction_size, 15.0);
    }

    #[test]
    fn test_category_percentages_sum_to_hundred() {
        let txs = vec![
            tx("u1", 10.0, "Food", None, "2024-01-01"),
            tx("u1", 20.0, "Rent", None, "2024-01-01"),
            tx("u1", 40.0, "", None, "2024-01-01"),
            tx("u1", 30.0, "Food", None, "2024-01-01"),
        ];
        let breakdown = category_breakdown(&txs);
        assert_eq!(breakdown[0].category, "Food");
        assert_eq!(breakdown[0].amount, 40.0);
        assert_eq!(breakdown[0].avg_amount, 20.0);
        assert_eq!(breakdown[1].category, "Other");
        let sum: f64 = breakdown.iter().map(|c| c.percentage).sum();
        assert!((sum - 100.0).abs() < 0.05);
    }

    #[test]
    fn test_status_distribution_defaults_to_completed() {
        let txs = vec![
            tx("u1", 1.0, "Food", None, "2024-01-01"),
            tx("u1", 1.0, "Food", Some("Pending"), "2024-01-01"),
            tx("u1", 1.0, "Food", Some("Completed"), "2024-01-01"),
        ];
        let distribution = status_distribution(&txs);
        assert_eq!(distribution[0].status, "Completed");
        assert_eq!(distribution[0].count, 2);
        assert_eq!(distribution[0].percentage, 66.67);
        assert_eq!(distribution[1].percentage, 33.33);
    }

    #[test]
    fn test_user_activity_tracks_latest_date_and_caps() {
        let mut txs = vec![
            tx("u1", 100.0, "Revenue", None, "2024-01-05T00:00:00.000Z"),
            tx("u1", 40.0, "Food", None, "2024-02-05T00:00:00.000Z"),
            tx("u1", 10.0, "Food", None, "2024-01-01T00:00:00.000Z"),
            tx("", 5.0, "Food", None, "2024-01-01T00:00:00.000Z"),
        ];
        for i in 0..20 {
            txs.push(tx(&format!("bulk{}", i), 1.0, "Food", None, "2024-01-01"));
        }
        let activity = user_activity(&txs);
        assert_eq!(activity.len(), TOP_USERS);
        assert_eq!(activity[0].user, "u1");
        assert_eq!(activity[0].total_amount, 150.0);
        assert_eq!(activity[0].net_value, 50.0);
        assert_eq!(activity[0].last_transaction, "2024-02-05T00:00:00.000Z");
        assert_eq!(activity[1].user, "Unknown");
    }

    #[test]
    fn test_amount_buckets_use_inclusive_lower_bound() {
        let txs = vec![
            tx("u1", 99.99, "Food", None, "2024-01-01"),
            tx("u1", 100.0, "Food", None, "2024-01-01"),
            tx("u1", -20_000.0, "Food", None, "2024-01-01"),
        ];
        let buckets = amount_distribution(&txs);
        let labels: Vec<&str> = buckets.iter().map(|b| b.range.as_str()).collect();
        assert_eq!(labels, vec!["$0-$100", "$100-$500", "$10K+"]);
        assert_eq!(buckets[2].total_amount, 20_000.0);
        assert_eq!(buckets[0].percentage, 33.33);
    }

    #[test]
    fn test_time_series_keeps_last_sixty_days() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let txs: Vec<Transaction> = (0..70)
            .map(|i| {
                let day = start + chrono::Duration::days(i);
                tx("u1", 10.0, "Food", None, &day.format("%Y-%m-%dT12:00:00.000Z").to_string())
            })
            .collect();
        let series = time_series(&txs);
        assert_eq!(series.len(), TIME_SERIES_DAYS);
        assert_eq!(series[0].date, "2024-01-11");
        assert_eq!(series.last().unwrap().date, "2024-03-10");
        assert_eq!(series[0].net, -10.0);
    }

    #[test]
    fn test_performance_metrics() {
        let txs = vec![
            tx("u1", 300.0, "Revenue", Some("Paid"), "2024-01-10"),
            tx("u1", 100.0, "Food", Some("Pending"), "2024-01-11"),
            tx("u1", 0.0, "Food", Some("Completed"), "2024-02-11"),
        ];
        let metrics = performance_metrics(&txs);
        assert_eq!(metrics[0].month, "Jan 2024");
        assert_eq!(metrics[0].profit, 200.0);
        assert_eq!(metrics[0].profit_margin, 66.67);
        assert_eq!(metrics[0].completion_rate, 50.0);
        assert_eq!(metrics[0].efficiency, 75.0);
        assert_eq!(metrics[1].efficiency, 0.0);
        assert_eq!(metrics[1].profit_margin, 0.0);
    }
}
