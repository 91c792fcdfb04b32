use crate::dto::api_response::ApiResponse;
use crate::service::chart_service::{ChartQuery, ChartService, ChartServiceImpl};
use crate::service::period::ChartSummaryPeriod;
use crate::util::error::HandlerError;
use axum::{
    extract::{rejection::QueryRejection, Json, Query, State},
    response::IntoResponse,
};
use std::collections::HashMap;
use std::sync::Arc;

pub async fn get_chart_data_handler(
    State(service): State<Arc<ChartServiceImpl>>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let Query(params) = params?;
    let query = ChartQuery::from_params(&params).map_err(HandlerError::bad_request)?;
    let series = service.get_chart_data(query).await?;
    let message = if series.has_data { "Chart data retrieved successfully" } else { "No transaction data available" };
    Ok(Json(ApiResponse::ok(message, series.points)))
}

pub async fn get_chart_summary_handler(
    State(service): State<Arc<ChartServiceImpl>>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let Query(params) = params?;
    let period = match params.get("period").map(|p| p.trim()).filter(|p| !p.is_empty()) {
        Some(raw) => raw.parse::<ChartSummaryPeriod>().map_err(HandlerError::bad_request)?,
        None => ChartSummaryPeriod::default(),
    };
    let summary = service.get_chart_summary(period).await?;
    Ok(Json(ApiResponse::ok("Chart summary retrieved successfully", summary)))
}
