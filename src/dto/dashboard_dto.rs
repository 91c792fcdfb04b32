use crate::dto::transaction_dto::TransactionResponse;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Increase,
    Decrease,
}

/// One of the four headline cards.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricCard {
    pub title: String,
    pub amount: f64,
    pub icon: String,
    pub change: f64,
    pub change_type: ChangeType,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardChartPoint {
    pub month: String,
    pub income: f64,
    pub expenses: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub metrics: Vec<MetricCard>,
    pub chart_data: Vec<DashboardChartPoint>,
    pub recent_transactions: Vec<TransactionResponse>,
}
