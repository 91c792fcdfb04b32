use serde::Serialize;

/// Bucket of the income/expense chart; `month` holds the bucket label.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub month: String,
    pub income: f64,
    pub expenses: f64,
    pub net_income: f64,
    pub transaction_count: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TopCategory {
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_income: f64,
    pub transaction_count: u64,
    pub avg_transaction_amount: f64,
    pub top_category: Option<TopCategory>,
    pub growth_rate: f64,
}

/// Series plus whether any transaction fell in the requested window.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub points: Vec<ChartPoint>,
    pub has_data: bool,
}
