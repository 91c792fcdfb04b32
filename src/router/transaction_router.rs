use crate::handler::transaction_handler::{export_transactions_handler, list_transactions_handler};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::transaction_service::TransactionServiceImpl;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn transaction_router(service: Arc<TransactionServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/transactions", get(list_transactions_handler))
        .route("/transactions/export", post(export_transactions_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(service)
}
