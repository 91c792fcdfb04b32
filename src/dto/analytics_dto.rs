use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    pub month: String,
    pub revenue: f64,
    pub expense: f64,
    pub net: f64,
    pub transactions: u64,
    pub revenue_transactions: u64,
    pub expense_transactions: u64,
    pub avg_transaction_size: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category: String,
    pub amount: f64,
    pub count: u64,
    pub avg_amount: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusDistribution {
    pub status: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    pub user: String,
    pub transactions: u64,
    pub total_amount: f64,
    pub revenue: f64,
    pub expenses: f64,
    pub avg_amount: f64,
    pub last_transaction: String,
    pub net_value: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AmountBucket {
    pub range: String,
    pub count: u64,
    pub total_amount: f64,
    pub percentage: f64,
    pub avg_amount: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub date: String,
    pub amount: f64,
    pub count: u64,
    pub revenue: f64,
    pub expenses: f64,
    pub avg_amount: f64,
    pub net: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetric {
    pub month: String,
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
    pub profit_margin: f64,
    pub completion_rate: f64,
    pub efficiency: f64,
    pub transactions: u64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub avg_transaction: f64,
    pub total_transactions: u64,
    pub profit_margin: f64,
}

/// Everything the analytics page draws.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub monthly_trends: Vec<MonthlyTrend>,
    pub category_breakdown: Vec<CategoryBreakdown>,
    pub status_distribution: Vec<StatusDistribution>,
    pub user_activity: Vec<UserActivity>,
    pub amount_distribution: Vec<AmountBucket>,
    pub time_series_data: Vec<DailyPoint>,
    pub performance_metrics: Vec<PerformanceMetric>,
    pub summary: Summary,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub top_category: Option<CategoryBreakdown>,
    pub most_active_user: Option<UserActivity>,
    pub avg_daily_transactions: f64,
    pub growth_rate: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub summary: Summary,
    pub insights: Insights,
    pub period: String,
    pub data_points: u64,
}
