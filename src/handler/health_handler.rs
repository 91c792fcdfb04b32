use crate::model::transaction::format_iso;
use crate::repository::transaction_repo::TransactionRepository;
use axum::{
    extract::{Json, State},
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

/// Liveness probe; always 200, reports whether MongoDB answers a ping.
pub async fn health_handler(State(repo): State<Arc<dyn TransactionRepository>>) -> impl IntoResponse {
    let database = match repo.ping().await {
        Ok(()) => "Connected",
        Err(e) => {
            warn!("Health check ping failed: {}", e);
            "Disconnected"
        }
    };
    Json(json!({
        "success": true,
        "message": "Server is running",
        "timestamp": format_iso(Utc::now()),
        "database": database,
    }))
}

pub async fn not_found_handler() -> impl IntoResponse {
    crate::util::error::HandlerError::not_found("Route not found")
}
