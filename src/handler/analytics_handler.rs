use crate::dto::api_response::ApiResponse;
use crate::service::analytics_service::{
    summary_period_from_params, AnalyticsService, AnalyticsServiceImpl, AnalyticsWindow,
};
use crate::util::error::HandlerError;
use axum::{
    extract::{rejection::QueryRejection, Json, Query, State},
    response::IntoResponse,
};
use std::collections::HashMap;
use std::sync::Arc;

pub async fn get_analytics_handler(
    State(service): State<Arc<AnalyticsServiceImpl>>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let Query(params) = params?;
    let window = AnalyticsWindow::from_params(&params).map_err(HandlerError::bad_request)?;
    let report = service.get_analytics(window).await?;
    let message = if report.summary.total_transactions == 0 {
        "No data available for the selected period"
    } else {
        "Analytics data retrieved successfully"
    };
    Ok(Json(ApiResponse::ok(message, report)))
}

pub async fn get_analytics_summary_handler(
    State(service): State<Arc<AnalyticsServiceImpl>>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let Query(params) = params?;
    let period = summary_period_from_params(&params).map_err(HandlerError::bad_request)?;
    let summary = service.get_summary(period).await?;
    Ok(Json(ApiResponse::ok("Analytics summary retrieved successfully", summary)))
}
