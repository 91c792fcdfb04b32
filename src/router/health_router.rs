use crate::handler::health_handler::health_handler;
use crate::repository::transaction_repo::TransactionRepository;
use axum::{routing::get, Router};
use std::sync::Arc;

pub fn health_router(repo: Arc<dyn TransactionRepository>) -> Router {
    Router::new().route("/health", get(health_handler)).with_state(repo)
}
