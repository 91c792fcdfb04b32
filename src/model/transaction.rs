use bson::oid::ObjectId;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Category that marks a transaction as income when no explicit direction is stored.
pub const REVENUE_CATEGORY: &str = "Revenue";
pub const DEFAULT_STATUS: &str = "Completed";
pub const DEFAULT_CATEGORY: &str = "Other";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Income,
    Expense,
}

impl Direction {
    /// Legacy rule: only the `Revenue` category counts as income.
    pub fn from_category(category: &str) -> Self {
        if category == REVENUE_CATEGORY {
            Direction::Income
        } else {
            Direction::Expense
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Income => "Income",
            Direction::Expense => "Expense",
        }
    }
}

/// Document stored in the `data` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: Option<String>,
    pub amount: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub status: Option<String>,
    /// ISO-8601 timestamp kept as text so range filters compare lexicographically.
    pub date: String,
    #[serde(rename = "user_profile", default)]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl Transaction {
    /// Explicit direction when stored, otherwise inferred from the category.
    pub fn direction(&self) -> Direction {
        self.direction.unwrap_or_else(|| Direction::from_category(&self.category))
    }

    pub fn is_income(&self) -> bool {
        self.direction() == Direction::Income
    }

    /// Aggregations work on magnitudes; the sign comes from `direction()`.
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }

    /// Amount with expenses negated, as shown in recent-activity lists.
    pub fn signed_amount(&self) -> f64 {
        match self.direction() {
            Direction::Income => self.magnitude(),
            Direction::Expense => -self.magnitude(),
        }
    }

    pub fn status_or_default(&self) -> &str {
        match self.status.as_deref() {
            Some(status) if !status.is_empty() => status,
            _ => DEFAULT_STATUS,
        }
    }

    pub fn category_or_default(&self) -> &str {
        if self.category.is_empty() {
            DEFAULT_CATEGORY
        } else {
            &self.category
        }
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_date(&self.date)
    }

    pub fn id_hex(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC) or a plain date.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Same layout as the stored `date` field, e.g. `2024-03-01T00:00:00.000Z`.
pub fn format_iso(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tx(category: &str, amount: f64) -> Transaction {
        Transaction {
            id: None,
            user_id: "u1".to_string(),
            user_name: None,
            amount,
            category: category.to_string(),
            status: None,
            date: "2024-03-05T10:00:00.000Z".to_string(),
            avatar: None,
            direction: None,
        }
    }

    #[test]
    fn test_direction_inferred_from_category() {
        assert_eq!(tx("Revenue", 10.0).direction(), Direction::Income);
        assert_eq!(tx("revenue", 10.0).direction(), Direction::Expense);
        assert_eq!(tx("Food", 10.0).direction(), Direction::Expense);
    }

    #[test]
    fn test_explicit_direction_wins() {
        let mut refund = tx("Refund", 10.0);
        refund.direction = Some(Direction::Income);
        assert!(refund.is_income());
    }

    #[test]
    fn test_signed_amount_uses_magnitude() {
        assert_eq!(tx("Revenue", -40.0).signed_amount(), 40.0);
        assert_eq!(tx("Food", 40.0).signed_amount(), -40.0);
    }

    #[test]
    fn test_defaults() {
        let t = tx("", 1.0);
        assert_eq!(t.status_or_default(), "Completed");
        assert_eq!(t.category_or_default(), "Other");
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();
        assert_eq!(parse_date("2024-03-05"), Some(expected));
        assert_eq!(parse_date("2024-03-05T00:00:00.000Z"), Some(expected));
        assert_eq!(parse_date("2024-03-05T00:00:00"), Some(expected));
        assert_eq!(parse_date("2024-03-05T02:00:00+02:00"), Some(expected));
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn test_format_iso_matches_stored_layout() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(format_iso(dt), "2024-03-05T07:08:09.000Z");
    }

    #[test]
    fn test_integer_amount_deserializes() {
        let doc = bson::doc! { "user_id": "u1", "amount": 250_i32, "category": "Food", "date": "2024-01-01" };
        let t: Transaction = bson::from_document(doc).unwrap();
        assert_eq!(t.amount, 250.0);
        assert!(t.direction.is_none());
    }
}
