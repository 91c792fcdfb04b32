pub mod analytics_handler;
pub mod auth_handler;
pub mod chart_handler;
pub mod dashboard_handler;
pub mod health_handler;
pub mod transaction_handler;
