use crate::dto::api_response::ApiResponse;
use crate::dto::transaction_dto::{ExportRequest, TransactionListQuery};
use crate::service::transaction_service::{TransactionService, TransactionServiceImpl};
use crate::util::error::HandlerError;
use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Json, Query, State},
    http::header,
    response::IntoResponse,
};
use std::collections::HashMap;
use std::sync::Arc;

pub async fn list_transactions_handler(
    State(service): State<Arc<TransactionServiceImpl>>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let Query(params) = params?;
    let query = TransactionListQuery::from_params(&params).map_err(HandlerError::bad_request)?;
    let (rows, pagination) = service.list(query).await?;
    Ok(Json(ApiResponse::ok("Transactions retrieved successfully", rows).with_pagination(pagination)))
}

pub async fn export_transactions_handler(
    State(service): State<Arc<TransactionServiceImpl>>,
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let Json(payload) = payload?;
    let csv = service.export_csv(payload).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=transactions.csv"),
        ],
        csv,
    ))
}
