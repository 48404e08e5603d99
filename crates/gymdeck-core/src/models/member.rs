// Allow dead code: API response structs have fields for completeness
#![allow(dead_code)]

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::analytics::dates::parse_day;
use crate::analytics::fees::parse_fee;
use crate::utils::format_phone;

/// Accept a fee that arrives as a JSON string, a number, or null.
/// The raw text is kept so parsing policy stays in one place (`fees::parse_fee`).
fn de_number_or_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Num(f64),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    Ok(raw.map(|r| match r {
        Raw::Text(s) => s,
        Raw::Num(n) => n.to_string(),
    }))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    #[serde(default, alias = "id")]
    pub athlete_id: Option<i64>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, deserialize_with = "de_number_or_string")]
    pub monthly_fee: Option<String>,
    #[serde(default)]
    pub membership_type: Option<String>,
    #[serde(default)]
    pub join_date: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "phone_number")]
    pub phone: Option<String>,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }

    pub fn id(&self) -> i64 {
        self.athlete_id.unwrap_or(0)
    }

    /// Monthly fee as a number. Malformed or missing values count as zero.
    pub fn fee(&self) -> f64 {
        parse_fee(self.monthly_fee.as_deref())
    }

    pub fn membership_type_display(&self) -> &str {
        self.membership_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("Standard")
    }

    /// Resolve the enrollment date from the first populated date field:
    /// join_date, then start_date, then created_at, then updated_at.
    /// An unparseable value does not fall through to the next field.
    pub fn enrollment_date(&self) -> Option<NaiveDate> {
        self.enrollment_field().and_then(|(_, raw)| parse_day(raw))
    }

    /// Which field supplied the enrollment date, for display
    pub fn enrollment_source(&self) -> Option<&'static str> {
        self.enrollment_field().map(|(name, _)| name)
    }

    fn enrollment_field(&self) -> Option<(&'static str, &str)> {
        let candidates = [
            ("join_date", &self.join_date),
            ("start_date", &self.start_date),
            ("created_at", &self.created_at),
            ("updated_at", &self.updated_at),
        ];
        candidates.into_iter().find_map(|(name, value)| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(|v| (name, v))
        })
    }

    pub fn expiry(&self) -> Option<NaiveDate> {
        self.expiry_date.as_deref().and_then(parse_day)
    }

    pub fn phone_display(&self) -> Option<String> {
        self.phone
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(format_phone)
    }

    pub fn email_display(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.is_empty())
    }
}

// Sorting options for the members table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberSortColumn {
    Name,
    Type,
    Fee,
    Status,
    Expiry,
}

impl MemberSortColumn {
    pub fn next(&self) -> Self {
        match self {
            MemberSortColumn::Name => MemberSortColumn::Type,
            MemberSortColumn::Type => MemberSortColumn::Fee,
            MemberSortColumn::Fee => MemberSortColumn::Status,
            MemberSortColumn::Status => MemberSortColumn::Expiry,
            MemberSortColumn::Expiry => MemberSortColumn::Name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_member_with_string_fee() {
        let json = r#"{"athlete_id": 12, "first_name": "Maria", "last_name": "Alvarez",
                       "monthly_fee": "49.99", "membership_type": "Premium",
                       "join_date": "2024-03-01"}"#;
        let m: Member = serde_json::from_str(json).expect("member should parse");
        assert_eq!(m.id(), 12);
        assert_eq!(m.fee(), 49.99);
        assert_eq!(m.membership_type_display(), "Premium");
    }

    #[test]
    fn test_parse_member_with_numeric_fee() {
        let json = r#"{"id": 7, "first_name": "Ben", "last_name": "Okafor", "monthly_fee": 65}"#;
        let m: Member = serde_json::from_str(json).expect("member should parse");
        // "id" is accepted as an alias for athlete_id
        assert_eq!(m.id(), 7);
        assert_eq!(m.fee(), 65.0);
    }

    #[test]
    fn test_parse_member_with_null_and_missing_fee() {
        let with_null: Member =
            serde_json::from_str(r#"{"first_name": "A", "last_name": "B", "monthly_fee": null}"#)
                .expect("null fee should parse");
        assert_eq!(with_null.fee(), 0.0);

        let without: Member = serde_json::from_str(r#"{"first_name": "A", "last_name": "B"}"#)
            .expect("missing fee should parse");
        assert_eq!(without.fee(), 0.0);
    }

    #[test]
    fn test_fee_garbage_string_counts_as_zero() {
        let m: Member = serde_json::from_str(
            r#"{"first_name": "A", "last_name": "B", "monthly_fee": "abc"}"#,
        )
        .expect("member should parse");
        assert_eq!(m.fee(), 0.0);
    }

    #[test]
    fn test_membership_type_defaults_to_standard() {
        let m: Member = serde_json::from_str(r#"{"first_name": "A", "last_name": "B"}"#)
            .expect("member should parse");
        assert_eq!(m.membership_type_display(), "Standard");

        let empty: Member = serde_json::from_str(
            r#"{"first_name": "A", "last_name": "B", "membership_type": ""}"#,
        )
        .expect("member should parse");
        assert_eq!(empty.membership_type_display(), "Standard");
    }

    #[test]
    fn test_enrollment_date_fallback_order() {
        let m: Member = serde_json::from_str(
            r#"{"first_name": "A", "last_name": "B",
                "start_date": "2024-02-01", "created_at": "2024-01-01T09:00:00Z"}"#,
        )
        .expect("member should parse");
        assert_eq!(m.enrollment_date(), NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(m.enrollment_source(), Some("start_date"));

        let fallback: Member = serde_json::from_str(
            r#"{"first_name": "A", "last_name": "B", "created_at": "2024-01-15T09:00:00Z"}"#,
        )
        .expect("member should parse");
        assert_eq!(
            fallback.enrollment_date(),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(fallback.enrollment_source(), Some("created_at"));
    }

    #[test]
    fn test_enrollment_date_bad_value_does_not_fall_through() {
        let m: Member = serde_json::from_str(
            r#"{"first_name": "A", "last_name": "B",
                "join_date": "not-a-date", "start_date": "2024-02-01"}"#,
        )
        .expect("member should parse");
        // join_date is populated, so it wins the resolution even though it
        // fails to parse
        assert_eq!(m.enrollment_source(), Some("join_date"));
        assert_eq!(m.enrollment_date(), None);
    }

    #[test]
    fn test_no_date_fields_resolves_to_none() {
        let m: Member = serde_json::from_str(r#"{"first_name": "A", "last_name": "B"}"#)
            .expect("member should parse");
        assert_eq!(m.enrollment_date(), None);
        assert_eq!(m.enrollment_source(), None);
    }

    #[test]
    fn test_display_names() {
        let m: Member =
            serde_json::from_str(r#"{"first_name": "Maria", "last_name": "Alvarez"}"#)
                .expect("member should parse");
        assert_eq!(m.full_name(), "Maria Alvarez");
        assert_eq!(m.display_name(), "Alvarez, Maria");
    }
}
