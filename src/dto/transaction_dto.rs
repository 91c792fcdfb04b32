use crate::model::transaction::Transaction;
use crate::repository::transaction_filter::{
    DateRange, PageRequest, SortDirection, SortField, TransactionSort, TypeFilter,
};
use crate::util::avatar::DEFAULT_AVATAR;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Row shape the dashboard table renders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub date: String,
    pub amount: f64,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub avatar: String,
    pub user_id: String,
    pub description: String,
}

impl From<&Transaction> for TransactionResponse {
    fn from(tx: &Transaction) -> Self {
        TransactionResponse {
            id: tx.id_hex(),
            name: tx
                .user_name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "Unknown User".to_string()),
            email: format!("{}@example.com", tx.user_id),
            date: tx.date.clone(),
            amount: tx.amount,
            status: tx.status_or_default().to_string(),
            kind: tx.direction().as_str().to_string(),
            category: tx.category.clone(),
            avatar: tx
                .avatar
                .clone()
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            user_id: tx.user_id.clone(),
            description: format!("{} transaction", tx.category),
        }
    }
}

/// Criteria shared by the list query string and the export body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    pub status: Option<String>,
    pub category: Option<String>,
    pub type_filter: TypeFilter,
    pub search: Option<String>,
    pub date_range: DateRange,
}

/// Parsed `GET /api/transactions` query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionListQuery {
    pub page: PageRequest,
    pub filters: FilterParams,
    pub sort: TransactionSort,
}

fn parse_param<T: FromStr<Err = String>>(params: &HashMap<String, String>, key: &str) -> Result<Option<T>, String> {
    params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(T::from_str)
        .transpose()
}

fn parse_number(params: &HashMap<String, String>, key: &str) -> Result<Option<u64>, String> {
    match params.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|_| format!("{} must be a positive integer", key)),
        None => Ok(None),
    }
}

impl TransactionListQuery {
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let page = parse_number(params, "page")?.unwrap_or(1);
        if page < 1 {
            return Err("page must be a positive integer".to_string());
        }
        let limit = parse_number(params, "limit")?.unwrap_or(PageRequest::DEFAULT_LIMIT);
        if !(1..=PageRequest::MAX_LIMIT).contains(&limit) {
            return Err(format!("limit must be between 1 and {}", PageRequest::MAX_LIMIT));
        }
        // The skip count is handed to MongoDB as an i64.
        let skip = (page - 1).checked_mul(limit).filter(|s| *s <= i64::MAX as u64);
        if skip.is_none() {
            return Err("page is out of range".to_string());
        }

        let filters = FilterParams {
            status: params.get("status").cloned(),
            category: params.get("category").cloned(),
            type_filter: parse_param(params, "type")?.unwrap_or_default(),
            search: params.get("search").cloned(),
            date_range: parse_param(params, "dateRange")?.unwrap_or_default(),
        };
        let sort = TransactionSort::new(
            parse_param::<SortField>(params, "sortField")?.unwrap_or_default(),
            parse_param::<SortDirection>(params, "sortDirection")?.unwrap_or_default(),
        );

        Ok(TransactionListQuery { page: PageRequest { page, limit }, filters, sort })
    }
}

/// Columns the CSV export can emit, in the client's naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportColumn {
    Name,
    Email,
    Date,
    Amount,
    Status,
    Type,
    Category,
    Description,
}

impl ExportColumn {
    pub fn header(&self) -> &'static str {
        match self {
            ExportColumn::Name => "name",
            ExportColumn::Email => "email",
            ExportColumn::Date => "date",
            ExportColumn::Amount => "amount",
            ExportColumn::Status => "status",
            ExportColumn::Type => "type",
            ExportColumn::Category => "category",
            ExportColumn::Description => "description",
        }
    }

    pub fn value(&self, row: &TransactionResponse) -> String {
        match self {
            ExportColumn::Name => row.name.clone(),
            ExportColumn::Email => row.email.clone(),
            ExportColumn::Date => row.date.clone(),
            ExportColumn::Amount => row.amount.to_string(),
            ExportColumn::Status => row.status.clone(),
            ExportColumn::Type => row.kind.clone(),
            ExportColumn::Category => row.category.clone(),
            ExportColumn::Description => row.description.clone(),
        }
    }
}

impl FromStr for ExportColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(ExportColumn::Name),
            "email" => Ok(ExportColumn::Email),
            "date" => Ok(ExportColumn::Date),
            "amount" => Ok(ExportColumn::Amount),
            "status" => Ok(ExportColumn::Status),
            "type" => Ok(ExportColumn::Type),
            "category" => Ok(ExportColumn::Category),
            "description" => Ok(ExportColumn::Description),
            other => Err(format!("Unknown export column: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportDateRange {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFilters {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub date_range: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportSort {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
}

/// Body of `POST /api/transactions/export`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub date_range: Option<ExportDateRange>,
    #[serde(default)]
    pub filters: Option<ExportFilters>,
    #[serde(default)]
    pub sort: Option<ExportSort>,
    #[serde(default)]
    pub format: Option<String>,
}

impl ExportRequest {
    pub fn parse_columns(&self) -> Result<Vec<ExportColumn>, String> {
        if self.columns.is_empty() {
            return Err("At least one column must be selected".to_string());
        }
        self.columns.iter().map(|c| c.trim().parse()).collect()
    }

    pub fn filter_params(&self) -> Result<FilterParams, String> {
        let filters = self.filters.clone().unwrap_or_default();
        let type_filter = match filters.kind.as_deref().map(str::trim) {
            Some(raw) => raw.parse()?,
            None => TypeFilter::All,
        };
        let date_range = match filters.date_range.as_deref().map(str::trim) {
            Some(raw) => raw.parse()?,
            None => DateRange::All,
        };
        Ok(FilterParams {
            status: filters.status,
            category: filters.category,
            type_filter,
            search: filters.search,
            date_range,
        })
    }

    pub fn sort(&self) -> Result<Option<TransactionSort>, String> {
        let Some(ref sort) = self.sort else {
            return Ok(None);
        };
        let field = match sort.field.as_deref() {
            Some(raw) => raw.parse()?,
            None => SortField::default(),
        };
        let direction = match sort.direction.as_deref() {
            Some(raw) => raw.parse()?,
            None => SortDirection::default(),
        };
        Ok(Some(TransactionSort::new(field, direction)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::transaction::Direction;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn tx() -> Transaction {
        Transaction {
            id: None,
            user_id: "user_042".to_string(),
            user_name: None,
            amount: 120.5,
            category: "Food".to_string(),
            status: None,
            date: "2024-02-01T00:00:00.000Z".to_string(),
            avatar: None,
            direction: None,
        }
    }

    #[test]
    fn test_response_defaults() {
        let row = TransactionResponse::from(&tx());
        assert_eq!(row.name, "Unknown User");
        assert_eq!(row.email, "user_042@example.com");
        assert_eq!(row.status, "Completed");
        assert_eq!(row.kind, "Expense");
        assert_eq!(row.avatar, DEFAULT_AVATAR);
        assert_eq!(row.description, "Food transaction");
    }

    #[test]
    fn test_response_type_follows_explicit_direction() {
        let mut t = tx();
        t.direction = Some(Direction::Income);
        let value = serde_json::to_value(TransactionResponse::from(&t)).unwrap();
        assert_eq!(value["type"], "Income");
        assert_eq!(value["userId"], "user_042");
    }

    #[test]
    fn test_list_query_defaults() {
        let query = TransactionListQuery::from_params(&HashMap::new()).unwrap();
        assert_eq!(query.page, PageRequest { page: 1, limit: 10 });
        assert_eq!(query.sort, TransactionSort::default());
        assert_eq!(query.filters.date_range, DateRange::All);
    }

    #[test]
    fn test_list_query_rejects_bad_values() {
        assert!(TransactionListQuery::from_params(&params(&[("page", "abc")])).is_err());
        assert!(TransactionListQuery::from_params(&params(&[("page", "0")])).is_err());
        assert!(TransactionListQuery::from_params(&params(&[("limit", "101")])).is_err());
        assert!(TransactionListQuery::from_params(&params(&[("dateRange", "1year")])).is_err());
        assert!(TransactionListQuery::from_params(&params(&[("sortField", "email")])).is_err());
    }

    #[test]
    fn test_list_query_bounds_page_offset() {
        let max = u64::MAX.to_string();
        assert_eq!(
            TransactionListQuery::from_params(&params(&[("page", max.as_str())])).unwrap_err(),
            "page is out of range"
        );
        let past_i64 = (i64::MAX as u64 / 10 + 2).to_string();
        assert!(TransactionListQuery::from_params(&params(&[("page", past_i64.as_str())])).is_err());

        let query = TransactionListQuery::from_params(&params(&[("page", "1000000"), ("limit", "100")])).unwrap();
        assert_eq!(query.page.skip(), 99_999_900);
    }

    #[test]
    fn test_list_query_parses_sort() {
        let query =
            TransactionListQuery::from_params(&params(&[("sortField", "amount"), ("sortDirection", "asc")])).unwrap();
        assert_eq!(query.sort, TransactionSort::new(SortField::Amount, SortDirection::Asc));
    }

    #[test]
    fn test_export_columns_validated() {
        let mut req = ExportRequest::default();
        assert!(req.parse_columns().is_err());
        req.columns = vec!["name".into(), "amount".into()];
        assert_eq!(req.parse_columns().unwrap(), vec![ExportColumn::Name, ExportColumn::Amount]);
        req.columns.push("password".into());
        assert!(req.parse_columns().is_err());
    }

    #[test]
    fn test_export_body_deserializes_client_shape() {
        let req: ExportRequest = serde_json::from_str(
            r#"{"columns":["name"],"dateRange":{"start":"2024-01-01","end":"2024-01-31"},
                "filters":{"status":"all","type":"income","category":"all","dateRange":"all"},"format":"csv"}"#,
        )
        .unwrap();
        let filters = req.filter_params().unwrap();
        assert_eq!(filters.type_filter, TypeFilter::Income);
        assert_eq!(req.date_range.unwrap().end.as_deref(), Some("2024-01-31"));
        assert!(req.sort.is_none());
    }
}
