use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analytics::dates::{parse_day, parse_day_and_time};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckIn {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, alias = "member_id")]
    pub athlete_id: Option<i64>,
    #[serde(default, alias = "member_name")]
    pub athlete_name: Option<String>,
    #[serde(default, alias = "timestamp", alias = "created_at")]
    pub checked_in_at: Option<String>,
    #[serde(default)]
    pub checked_out_at: Option<String>,
}

impl CheckIn {
    /// Local calendar day of the check-in, if the timestamp parses
    pub fn date(&self) -> Option<NaiveDate> {
        self.checked_in_at.as_deref().and_then(parse_day)
    }

    pub fn is_on(&self, day: NaiveDate) -> bool {
        self.date() == Some(day)
    }

    pub fn time_display(&self) -> String {
        self.checked_in_at
            .as_deref()
            .and_then(parse_day_and_time)
            .map(|dt| dt.format("%H:%M").to_string())
            .unwrap_or_else(|| "--:--".to_string())
    }

    pub fn name_display(&self) -> &str {
        self.athlete_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("(unknown member)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkin_date_from_timestamp() {
        let c: CheckIn = serde_json::from_str(
            r#"{"member_id": 4, "member_name": "Ben Okafor",
                "timestamp": "2024-03-01T07:45:00"}"#,
        )
        .expect("check-in should parse");
        assert_eq!(c.athlete_id, Some(4));
        assert!(c.is_on(NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")));
        assert_eq!(c.time_display(), "07:45");
    }

    #[test]
    fn test_checkin_bad_timestamp() {
        let c: CheckIn =
            serde_json::from_str(r#"{"checked_in_at": "whenever"}"#).expect("should parse");
        assert_eq!(c.date(), None);
        assert_eq!(c.time_display(), "--:--");
        assert_eq!(c.name_display(), "(unknown member)");
    }
}
