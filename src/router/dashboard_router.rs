use crate::handler::dashboard_handler::get_dashboard_handler;
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::dashboard_service::DashboardServiceImpl;
use axum::{middleware, routing::get, Router};
use std::sync::Arc;

pub fn dashboard_router(service: Arc<DashboardServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/dashboard", get(get_dashboard_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(service)
}
