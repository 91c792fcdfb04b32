use crate::dto::api_response::Pagination;
use crate::dto::transaction_dto::{ExportColumn, ExportRequest, FilterParams, TransactionListQuery, TransactionResponse};
use crate::model::transaction::{parse_date, Transaction};
use crate::repository::transaction_filter::TransactionFilter;
use crate::repository::transaction_repo::TransactionRepository;
use crate::util::error::ServiceError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::Arc;
use tracing::{error, info, instrument};

#[async_trait]
pub trait TransactionService: Send + Sync {
    async fn list(&self, query: TransactionListQuery) -> Result<(Vec<TransactionResponse>, Pagination), ServiceError>;
    /// Renders the matching transactions as CSV text.
    async fn export_csv(&self, request: ExportRequest) -> Result<String, ServiceError>;
}

pub struct TransactionServiceImpl {
    pub transaction_repo: Arc<dyn TransactionRepository>,
}

impl TransactionServiceImpl {
    pub fn new(transaction_repo: Arc<dyn TransactionRepository>) -> Self {
        Self { transaction_repo }
    }
}

pub fn build_filter(params: &FilterParams, now: DateTime<Utc>) -> TransactionFilter {
    TransactionFilter::new()
        .with_date_range(params.date_range, now)
        .with_status(params.status.as_deref())
        .with_category(params.category.as_deref())
        .with_type(params.type_filter)
        .with_search(params.search.as_deref())
}

/// A bare `YYYY-MM-DD` end bound covers the whole day.
pub fn parse_end_bound(raw: &str) -> Option<DateTime<Utc>> {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(day) => day
            .succ_opt()
            .and_then(|next| next.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc() - Duration::milliseconds(1)),
        Err(_) => parse_date(raw),
    }
}

/// Builds the export filter: preset range and criteria first, then the
/// explicit `{start, end}` bounds when both are given.
pub fn export_filter(request: &ExportRequest, now: DateTime<Utc>) -> Result<TransactionFilter, ServiceError> {
    let params = request.filter_params().map_err(ServiceError::InvalidInput)?;
    let mut filter = build_filter(&params, now);

    let bounds = request
        .date_range
        .as_ref()
        .and_then(|r| match (r.start.as_deref(), r.end.as_deref()) {
            (Some(start), Some(end)) if !start.trim().is_empty() && !end.trim().is_empty() => Some((start, end)),
            _ => None,
        });
    if let Some((start, end)) = bounds {
        let from = parse_date(start)
            .ok_or_else(|| ServiceError::InvalidInput(format!("Invalid start date: {}", start)))?;
        let to = parse_end_bound(end).ok_or_else(|| ServiceError::InvalidInput(format!("Invalid end date: {}", end)))?;
        filter = filter.since(from).until(to);
    }
    Ok(filter)
}

pub fn write_csv(columns: &[ExportColumn], transactions: &[Transaction]) -> Result<String, ServiceError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let csv_error = |e: csv::Error| ServiceError::InternalError(format!("CSV write error: {}", e));

    writer
        .write_record(columns.iter().map(ExportColumn::header))
        .map_err(csv_error)?;
    for tx in transactions {
        let row = TransactionResponse::from(tx);
        writer
            .write_record(columns.iter().map(|c| c.value(&row)))
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ServiceError::InternalError(format!("CSV flush error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| ServiceError::InternalError(format!("CSV encoding error: {}", e)))
}

#[async_trait]
impl TransactionService for TransactionServiceImpl {
    #[instrument(skip(self, query), fields(page = query.page.page, limit = query.page.limit))]
    async fn list(&self, query: TransactionListQuery) -> Result<(Vec<TransactionResponse>, Pagination), ServiceError> {
        let filter = build_filter(&query.filters, Utc::now());
        let transactions = self.transaction_repo.find_page(&filter, &query.sort, query.page).await?;
        let total = self.transaction_repo.count(&filter).await?;
        info!(returned = transactions.len(), total, "Transactions listed");

        let rows = transactions.iter().map(TransactionResponse::from).collect();
        let pagination = Pagination { page: query.page.page, limit: query.page.limit, total };
        Ok((rows, pagination))
    }

    #[instrument(skip(self, request))]
    async fn export_csv(&self, request: ExportRequest) -> Result<String, ServiceError> {
        let columns = request.parse_columns().map_err(ServiceError::InvalidInput)?;
        match request.format.as_deref().map(str::trim) {
            None | Some("") => {}
            Some(format) if format.eq_ignore_ascii_case("csv") => {}
            Some(other) => {
                return Err(ServiceError::InvalidInput(format!("Unsupported export format: {}", other)));
            }
        }
        let filter = export_filter(&request, Utc::now())?;
        let sort = request.sort().map_err(ServiceError::InvalidInput)?;

        let transactions = self.transaction_repo.find_all(&filter, sort.as_ref()).await?;
        let csv = write_csv(&columns, &transactions).map_err(|e| {
            error!("Export failed: {}", e);
            e
        })?;
        info!(rows = transactions.len(), columns = columns.len(), "Transactions exported");
        Ok(csv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::transaction_dto::ExportDateRange;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_date_only_end_covers_whole_day() {
        let request = ExportRequest {
            columns: vec!["name".into()],
            date_range: Some(ExportDateRange {
                start: Some("2024-01-01".into()),
                end: Some("2024-01-31".into()),
            }),
            ..Default::default()
        };
        let filter = export_filter(&request, now()).unwrap();
        assert_eq!(filter.date_from.as_deref(), Some("2024-01-01T00:00:00.000Z"));
        assert_eq!(filter.date_to.as_deref(), Some("2024-01-31T23:59:59.999Z"));
    }

    #[test]
    fn test_half_open_range_is_ignored() {
        let request = ExportRequest {
            date_range: Some(ExportDateRange { start: Some("2024-01-01".into()), end: None }),
            ..Default::default()
        };
        let filter = export_filter(&request, now()).unwrap();
        assert!(filter.date_from.is_none());
        assert!(filter.date_to.is_none());
    }

    #[test]
    fn test_invalid_bound_is_rejected() {
        let request = ExportRequest {
            date_range: Some(ExportDateRange { start: Some("yesterday".into()), end: Some("2024-01-31".into()) }),
            ..Default::default()
        };
        assert!(matches!(export_filter(&request, now()), Err(ServiceError::InvalidInput(_))));
    }

    #[test]
    fn test_csv_quotes_fields_with_commas() {
        let tx = Transaction {
            id: None,
            user_id: "user_001".to_string(),
            user_name: Some("Doe, Jane".to_string()),
            amount: 42.5,
            category: "Food".to_string(),
            status: Some("Paid".to_string()),
            date: "2024-01-02T00:00:00.000Z".to_string(),
            avatar: None,
            direction: None,
        };
        let csv = write_csv(&[ExportColumn::Name, ExportColumn::Amount, ExportColumn::Type], &[tx]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "name,amount,type");
        assert_eq!(lines[1], "\"Doe, Jane\",42.5,Expense");
    }
}
