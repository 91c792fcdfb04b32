use crate::dto::api_response::ApiResponse;
use crate::service::dashboard_service::{DashboardService, DashboardServiceImpl};
use crate::util::error::HandlerError;
use axum::{
    extract::{Json, State},
    response::IntoResponse,
};
use std::sync::Arc;

pub async fn get_dashboard_handler(
    State(service): State<Arc<DashboardServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    let data = service.get_dashboard().await?;
    Ok(Json(ApiResponse::ok("Dashboard data retrieved successfully", data)))
}
