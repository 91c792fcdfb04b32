pub mod aggregation;
pub mod analytics_service;
pub mod chart_service;
pub mod dashboard_service;
pub mod period;
pub mod transaction_service;
pub mod user_service;
