use crate::handler::analytics_handler::{get_analytics_handler, get_analytics_summary_handler};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::analytics_service::AnalyticsServiceImpl;
use axum::{middleware, routing::get, Router};
use std::sync::Arc;

pub fn analytics_router(service: Arc<AnalyticsServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/analytics", get(get_analytics_handler))
        .route("/analytics/summary", get(get_analytics_summary_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(service)
}
