//! Membership status classification.
//!
//! Status is a pure function of `expiry_date` and the current day,
//! recomputed on every read and never stored.

use chrono::NaiveDate;

use crate::models::Member;

/// Memberships with this many days or fewer remaining count as expiring
const EXPIRING_SOON_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipStatus {
    Active,
    ExpiringSoon,
    Expired,
}

impl MembershipStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MembershipStatus::Active => "Active",
            MembershipStatus::ExpiringSoon => "Expiring",
            MembershipStatus::Expired => "Expired",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub status: MembershipStatus,
    /// Whole days until expiry, negative once past it. Zero when no
    /// expiry date is on file.
    pub days_remaining: i64,
}

impl Classification {
    pub fn status_display(&self, has_expiry: bool) -> String {
        match self.status {
            MembershipStatus::Active if !has_expiry => "Active (no expiry on file)".to_string(),
            MembershipStatus::Active => format!("Active ({} days left)", self.days_remaining),
            MembershipStatus::ExpiringSoon => {
                format!("Expiring in {} days", self.days_remaining)
            }
            MembershipStatus::Expired => {
                format!("Expired {} days ago", -self.days_remaining)
            }
        }
    }
}

/// Classify a member's status as of `today`.
/// A member with no expiry date on file is Active with zero days remaining.
pub fn classify(member: &Member, today: NaiveDate) -> Classification {
    match member.expiry() {
        Some(expiry) => {
            let days_remaining = (expiry - today).num_days();
            let status = if days_remaining < 0 {
                MembershipStatus::Expired
            } else if days_remaining <= EXPIRING_SOON_DAYS {
                MembershipStatus::ExpiringSoon
            } else {
                MembershipStatus::Active
            };
            Classification {
                status,
                days_remaining,
            }
        }
        None => Classification {
            status: MembershipStatus::Active,
            days_remaining: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn member_expiring(expiry: NaiveDate) -> Member {
        serde_json::from_str(&format!(
            r#"{{"first_name": "A", "last_name": "B", "expiry_date": "{}"}}"#,
            expiry.format("%Y-%m-%d")
        ))
        .expect("member should parse")
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date")
    }

    #[test]
    fn test_boundary_seven_days_is_expiring() {
        let c = classify(&member_expiring(today() + Duration::days(7)), today());
        assert_eq!(c.status, MembershipStatus::ExpiringSoon);
        assert_eq!(c.days_remaining, 7);
    }

    #[test]
    fn test_boundary_eight_days_is_active() {
        let c = classify(&member_expiring(today() + Duration::days(8)), today());
        assert_eq!(c.status, MembershipStatus::Active);
        assert_eq!(c.days_remaining, 8);
    }

    #[test]
    fn test_expiry_today_is_expiring() {
        let c = classify(&member_expiring(today()), today());
        assert_eq!(c.status, MembershipStatus::ExpiringSoon);
        assert_eq!(c.days_remaining, 0);
    }

    #[test]
    fn test_one_day_past_is_expired() {
        let c = classify(&member_expiring(today() - Duration::days(1)), today());
        assert_eq!(c.status, MembershipStatus::Expired);
        assert_eq!(c.days_remaining, -1);
    }

    #[test]
    fn test_no_expiry_is_active_with_zero_days() {
        let m: Member = serde_json::from_str(r#"{"first_name": "A", "last_name": "B"}"#)
            .expect("member should parse");
        let c = classify(&m, today());
        assert_eq!(c.status, MembershipStatus::Active);
        assert_eq!(c.days_remaining, 0);
        assert_eq!(c.status_display(false), "Active (no expiry on file)");
    }

    #[test]
    fn test_classification_is_idempotent() {
        let m = member_expiring(today() + Duration::days(3));
        assert_eq!(classify(&m, today()), classify(&m, today()));
    }
}
