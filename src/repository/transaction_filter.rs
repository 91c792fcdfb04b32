//! Typed query building for the `data` collection.
//!
//! Request parameters are parsed into the enums below first, so only known
//! values ever reach MongoDB. `TransactionFilter::matches` mirrors the
//! generated document for code that filters an in-memory list.

use crate::model::transaction::{format_iso, Transaction, REVENUE_CATEGORY};
use bson::{doc, Bson, Document, Regex};
use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    Last7Days,
    Last30Days,
    Last90Days,
    #[default]
    All,
}

impl DateRange {
    pub fn days(&self) -> Option<i64> {
        match self {
            DateRange::Last7Days => Some(7),
            DateRange::Last30Days => Some(30),
            DateRange::Last90Days => Some(90),
            DateRange::All => None,
        }
    }
}

impl FromStr for DateRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7days" => Ok(DateRange::Last7Days),
            "30days" => Ok(DateRange::Last30Days),
            "90days" => Ok(DateRange::Last90Days),
            "all" | "" => Ok(DateRange::All),
            other => Err(format!("Invalid dateRange: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Date,
    Amount,
    Name,
    Status,
}

impl SortField {
    /// Stored field the sort applies to.
    pub fn field_name(&self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::Amount => "amount",
            SortField::Name => "user_name",
            SortField::Status => "status",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(SortField::Date),
            "amount" => Ok(SortField::Amount),
            "name" => Ok(SortField::Name),
            "status" => Ok(SortField::Status),
            other => Err(format!("Invalid sortField: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_i32(&self) -> i32 {
        match self {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("Invalid sortDirection: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" | "" => Ok(TypeFilter::All),
            "income" | "Income" => Ok(TypeFilter::Income),
            "expense" | "Expense" => Ok(TypeFilter::Expense),
            other => Err(format!("Invalid type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransactionSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl TransactionSort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        TransactionSort { field, direction }
    }

    /// `_id` breaks ties so page boundaries stay stable.
    pub fn to_document(&self) -> Document {
        let dir = self.direction.as_i32();
        let mut sort = Document::new();
        sort.insert(self.field.field_name(), dir);
        sort.insert("_id", dir);
        sort
    }

    pub fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        let ordering = match self.field {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Amount => a.amount.partial_cmp(&b.amount).unwrap_or(Ordering::Equal),
            SortField::Name => a.user_name.cmp(&b.user_name),
            SortField::Status => a.status.cmp(&b.status),
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Conjunction of optional criteria over the `data` collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Inclusive lower bound on the ISO `date` string.
    pub date_from: Option<String>,
    /// Inclusive upper bound on the ISO `date` string.
    pub date_to: Option<String>,
    /// Case-insensitive substring of `status`.
    pub status: Option<String>,
    /// Case-insensitive substring of `category`.
    pub category: Option<String>,
    pub type_filter: TypeFilter,
    /// Case-insensitive substring of `user_name`, `user_id` or `category`.
    pub search: Option<String>,
}

/// `all`, blank and missing all mean "no constraint".
fn non_trivial(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
        .map(str::to_string)
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn since(mut self, from: DateTime<Utc>) -> Self {
        self.date_from = Some(format_iso(from));
        self
    }

    pub fn until(mut self, to: DateTime<Utc>) -> Self {
        self.date_to = Some(format_iso(to));
        self
    }

    pub fn with_date_range(self, range: DateRange, now: DateTime<Utc>) -> Self {
        match range.days() {
            Some(days) => self.since(now - Duration::days(days)),
            None => self,
        }
    }

    pub fn with_status(mut self, status: Option<&str>) -> Self {
        self.status = non_trivial(status);
        self
    }

    pub fn with_category(mut self, category: Option<&str>) -> Self {
        self.category = non_trivial(category);
        self
    }

    pub fn with_type(mut self, type_filter: TypeFilter) -> Self {
        self.type_filter = type_filter;
        self
    }

    pub fn with_search(mut self, search: Option<&str>) -> Self {
        self.search = search.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        self
    }

    pub fn to_document(&self) -> Document {
        let mut clauses: Vec<Document> = Vec::new();

        if self.date_from.is_some() || self.date_to.is_some() {
            let mut range = Document::new();
            if let Some(ref from) = self.date_from {
                range.insert("$gte", from.clone());
            }
            if let Some(ref to) = self.date_to {
                range.insert("$lte", to.clone());
            }
            clauses.push(doc! { "date": range });
        }
        if let Some(ref status) = self.status {
            clauses.push(doc! { "status": contains_regex(status) });
        }
        if let Some(ref category) = self.category {
            clauses.push(doc! { "category": contains_regex(category) });
        }
        match self.type_filter {
            TypeFilter::All => {}
            TypeFilter::Income => clauses.push(doc! {
                "$or": [
                    { "direction": "Income" },
                    { "direction": Bson::Null, "category": REVENUE_CATEGORY },
                ]
            }),
            TypeFilter::Expense => clauses.push(doc! {
                "$or": [
                    { "direction": "Expense" },
                    { "direction": Bson::Null, "category": { "$ne": REVENUE_CATEGORY } },
                ]
            }),
        }
        if let Some(ref search) = self.search {
            clauses.push(doc! {
                "$or": [
                    { "user_name": contains_regex(search) },
                    { "user_id": contains_regex(search) },
                    { "category": contains_regex(search) },
                ]
            });
        }

        match clauses.len() {
            0 => Document::new(),
            1 => clauses.remove(0),
            _ => doc! { "$and": clauses },
        }
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(ref from) = self.date_from {
            if tx.date.as_str() < from.as_str() {
                return false;
            }
        }
        if let Some(ref to) = self.date_to {
            if tx.date.as_str() > to.as_str() {
                return false;
            }
        }
        if let Some(ref status) = self.status {
            if !tx.status.as_deref().is_some_and(|s| contains_ignore_case(s, status)) {
                return false;
            }
        }
        if let Some(ref category) = self.category {
            if !contains_ignore_case(&tx.category, category) {
                return false;
            }
        }
        let income = tx.is_income();
        match self.type_filter {
            TypeFilter::Income if !income => return false,
            TypeFilter::Expense if income => return false,
            _ => {}
        }
        if let Some(ref search) = self.search {
            let hit = tx.user_name.as_deref().is_some_and(|n| contains_ignore_case(n, search))
                || contains_ignore_case(&tx.user_id, search)
                || contains_ignore_case(&tx.category, search);
            if !hit {
                return false;
            }
        }
        true
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn contains_regex(text: &str) -> Regex {
    Regex { pattern: escape_regex(text), options: "i".to_string() }
}

/// Escapes regex metacharacters so user text is matched literally.
pub fn escape_regex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$' | '-' | '/'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: u64 = 10;
    pub const MAX_LIMIT: u64 = 100;

    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest { page: 1, limit: Self::DEFAULT_LIMIT }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::transaction::Direction;
    use chrono::TimeZone;

    fn tx(user_name: &str, category: &str, status: Option<&str>, date: &str) -> Transaction {
        Transaction {
            id: None,
            user_id: "user_001".to_string(),
            user_name: Some(user_name.to_string()),
            amount: 10.0,
            category: category.to_string(),
            status: status.map(str::to_string),
            date: date.to_string(),
            avatar: None,
            direction: None,
        }
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("7days".parse::<DateRange>().unwrap(), DateRange::Last7Days);
        assert_eq!("all".parse::<DateRange>().unwrap(), DateRange::All);
        assert!("1year".parse::<DateRange>().is_err());
        assert_eq!("name".parse::<SortField>().unwrap().field_name(), "user_name");
        assert!("email".parse::<SortField>().is_err());
        assert_eq!("asc".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert!("up".parse::<SortDirection>().is_err());
        assert_eq!("income".parse::<TypeFilter>().unwrap(), TypeFilter::Income);
    }

    #[test]
    fn test_empty_filter_is_empty_document() {
        assert!(TransactionFilter::new().with_status(Some("all")).to_document().is_empty());
    }

    #[test]
    fn test_single_clause_is_not_wrapped() {
        let doc = TransactionFilter::new().with_status(Some("pending")).to_document();
        let regex = doc.get("status").unwrap();
        assert_eq!(regex, &Bson::RegularExpression(Regex { pattern: "pending".into(), options: "i".into() }));
    }

    #[test]
    fn test_multiple_clauses_are_anded() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let doc = TransactionFilter::new()
            .with_date_range(DateRange::Last7Days, now)
            .with_category(Some("Food"))
            .to_document();
        let clauses = doc.get_array("$and").unwrap();
        assert_eq!(clauses.len(), 2);
        let date = clauses[0].as_document().unwrap().get_document("date").unwrap();
        assert_eq!(date.get_str("$gte").unwrap(), "2024-03-03T12:00:00.000Z");
    }

    #[test]
    fn test_search_text_is_escaped() {
        assert_eq!(escape_regex("a.b*(c)"), "a\\.b\\*\\(c\\)");
        let filter = TransactionFilter::new().with_search(Some("  .* "));
        assert_eq!(filter.search.as_deref(), Some(".*"));
        assert!(!filter.matches(&tx("Jane", "Food", None, "2024-01-01")));
    }

    #[test]
    fn test_matches_date_window() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let filter = TransactionFilter::new().with_date_range(DateRange::Last7Days, now);
        assert!(filter.matches(&tx("A", "Food", None, "2024-03-05T00:00:00.000Z")));
        assert!(!filter.matches(&tx("A", "Food", None, "2024-02-28T00:00:00.000Z")));
    }

    #[test]
    fn test_matches_status_and_category_case_insensitively() {
        let filter = TransactionFilter::new().with_status(Some("PAID")).with_category(Some("rev"));
        assert!(filter.matches(&tx("A", "Revenue", Some("Paid"), "2024-01-01")));
        assert!(!filter.matches(&tx("A", "Revenue", None, "2024-01-01")));
    }

    #[test]
    fn test_matches_type_uses_direction() {
        let income = TransactionFilter::new().with_type(TypeFilter::Income);
        let expense = TransactionFilter::new().with_type(TypeFilter::Expense);
        let revenue = tx("A", "Revenue", None, "2024-01-01");
        let mut refund = tx("A", "Refund", None, "2024-01-01");
        refund.direction = Some(Direction::Income);
        assert!(income.matches(&revenue));
        assert!(income.matches(&refund));
        assert!(!expense.matches(&refund));
        assert!(expense.matches(&tx("A", "Food", None, "2024-01-01")));
    }

    #[test]
    fn test_search_matches_user_fields() {
        let filter = TransactionFilter::new().with_search(Some("jane"));
        assert!(filter.matches(&tx("Jane Doe", "Food", None, "2024-01-01")));
        let filter = TransactionFilter::new().with_search(Some("USER_0"));
        assert!(filter.matches(&tx("Jane Doe", "Food", None, "2024-01-01")));
    }

    #[test]
    fn test_sort_document_and_compare() {
        let sort = TransactionSort::new(SortField::Amount, SortDirection::Asc);
        assert_eq!(sort.to_document(), doc! { "amount": 1, "_id": 1 });
        let mut a = tx("A", "Food", None, "2024-01-01");
        let mut b = tx("B", "Food", None, "2024-01-02");
        a.amount = 5.0;
        b.amount = 7.0;
        assert_eq!(sort.compare(&a, &b), Ordering::Less);
        let by_date_desc = TransactionSort::default();
        assert_eq!(by_date_desc.compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn test_page_skip() {
        assert_eq!(PageRequest { page: 3, limit: 10 }.skip(), 20);
        assert_eq!(PageRequest::default().skip(), 0);
        assert_eq!(PageRequest { page: u64::MAX, limit: 100 }.skip(), u64::MAX);
    }
}
