use crate::handler::chart_handler::{get_chart_data_handler, get_chart_summary_handler};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::chart_service::ChartServiceImpl;
use axum::{middleware, routing::get, Router};
use std::sync::Arc;

pub fn chart_router(service: Arc<ChartServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/charts/data", get(get_chart_data_handler))
        .route("/charts/summary", get(get_chart_summary_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(service)
}
