//! Revenue aggregation over enrollment dates.
//!
//! All functions filter by the resolved enrollment date (see
//! `Member::enrollment_date`) and sum monthly fees. The weekend surcharge
//! applies to the single-day view only; range, comparison, and trend views
//! deliberately stay unmultiplied.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::models::Member;

/// Surcharge applied to single-day revenue on Saturdays and Sundays
const WEEKEND_MULTIPLIER: f64 = 1.2;

/// Default number of trailing calendar months in the revenue trend
pub const TREND_MONTHS: u32 = 6;

/// What to do with members that have no date field at all.
///
/// The backend sometimes lags on populating dates for newly registered
/// members; counting them as enrolled today keeps them visible in the
/// daily view until it catches up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum MissingDatePolicy {
    /// Treat a member with no dates as enrolled today
    #[default]
    CountAsToday,
    /// Leave dateless members out of the daily view
    Exclude,
}

impl MissingDatePolicy {
    pub fn label(&self) -> &'static str {
        match self {
            MissingDatePolicy::CountAsToday => "dateless members count as today",
            MissingDatePolicy::Exclude => "dateless members excluded",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodComparison {
    pub current: f64,
    pub previous: f64,
    pub percent_change: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthRevenue {
    /// Display label like "Mar 2024"
    pub label: String,
    pub revenue: f64,
}

/// Revenue from members enrolled on `date`, with the weekend surcharge.
///
/// `today` anchors the missing-date policy: under `CountAsToday`, a member
/// with no date fields counts only when `date` is today.
pub fn daily_revenue(
    members: &[Member],
    date: NaiveDate,
    today: NaiveDate,
    policy: MissingDatePolicy,
) -> f64 {
    let sum: f64 = members
        .iter()
        .filter(|m| match m.enrollment_date() {
            Some(enrolled) => enrolled == date,
            None => policy == MissingDatePolicy::CountAsToday && date == today,
        })
        .map(|m| m.fee())
        .sum();

    if is_weekend(date) {
        sum * WEEKEND_MULTIPLIER
    } else {
        sum
    }
}

/// Revenue from members enrolled within [start, end], inclusive.
/// No weekend surcharge, and dateless members never match a range.
pub fn range_revenue(members: &[Member], start: NaiveDate, end: NaiveDate) -> f64 {
    members
        .iter()
        .filter(|m| {
            m.enrollment_date()
                .map(|d| start <= d && d <= end)
                .unwrap_or(false)
        })
        .map(|m| m.fee())
        .sum()
}

/// Compare revenue in [start, end] against the immediately preceding
/// window of the same length. Percent change is zero when the previous
/// window had no revenue.
pub fn period_comparison(members: &[Member], start: NaiveDate, end: NaiveDate) -> PeriodComparison {
    let duration = end - start;
    let previous_end = start - Duration::days(1);
    let previous_start = previous_end - duration;

    let current = range_revenue(members, start, end);
    let previous = range_revenue(members, previous_start, previous_end);

    let percent_change = if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    };

    PeriodComparison {
        current,
        previous,
        percent_change,
    }
}

/// Revenue for each of the trailing `months` calendar months, oldest
/// first, including the month containing `today`.
pub fn monthly_trend(members: &[Member], today: NaiveDate, months: u32) -> Vec<MonthRevenue> {
    let mut trend = Vec::with_capacity(months as usize);

    for offset in (0..months).rev() {
        let Some(start) = month_start(today, offset) else {
            continue;
        };
        let end = month_end(start);
        trend.push(MonthRevenue {
            label: start.format("%b %Y").to_string(),
            revenue: range_revenue(members, start, end),
        });
    }

    trend
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// First day of the month `offset` calendar months before `today`'s month
fn month_start(today: NaiveDate, offset: u32) -> Option<NaiveDate> {
    let months0 = today.year() * 12 + today.month0() as i32 - offset as i32;
    NaiveDate::from_ymd_opt(months0.div_euclid(12), months0.rem_euclid(12) as u32 + 1, 1)
}

/// Last day of the month containing `start`
fn month_end(start: NaiveDate) -> NaiveDate {
    let next = month_start(start, 0)
        .and_then(|d| {
            if d.month() == 12 {
                NaiveDate::from_ymd_opt(d.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(d.year(), d.month() + 1, 1)
            }
        })
        .unwrap_or(start);
    next - Duration::days(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(fee: &str, join_date: &str) -> Member {
        serde_json::from_str(&format!(
            r#"{{"first_name": "A", "last_name": "B",
                 "monthly_fee": "{}", "join_date": "{}"}}"#,
            fee, join_date
        ))
        .expect("member should parse")
    }

    fn dateless_member(fee: &str) -> Member {
        serde_json::from_str(&format!(
            r#"{{"first_name": "A", "last_name": "B", "monthly_fee": "{}"}}"#,
            fee
        ))
        .expect("member should parse")
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_daily_revenue_weekday() {
        // 2024-03-01 is a Friday
        let members = vec![member("50", "2024-03-01"), member("30", "2024-03-01")];
        let date = day(2024, 3, 1);
        assert_eq!(
            daily_revenue(&members, date, date, MissingDatePolicy::CountAsToday),
            80.0
        );
    }

    #[test]
    fn test_daily_revenue_weekend_surcharge() {
        // 2024-03-02 is a Saturday, 2024-03-05 a Tuesday
        let saturday = vec![member("100", "2024-03-02")];
        assert_eq!(
            daily_revenue(
                &saturday,
                day(2024, 3, 2),
                day(2024, 3, 2),
                MissingDatePolicy::CountAsToday
            ),
            120.0
        );

        let tuesday = vec![member("100", "2024-03-05")];
        assert_eq!(
            daily_revenue(
                &tuesday,
                day(2024, 3, 5),
                day(2024, 3, 5),
                MissingDatePolicy::CountAsToday
            ),
            100.0
        );
    }

    #[test]
    fn test_surcharge_applies_to_daily_view_only() {
        // The same Saturday queried as a one-day range stays unmultiplied
        let saturday = day(2024, 3, 2);
        let members = vec![member("100", "2024-03-02")];
        assert_eq!(
            daily_revenue(&members, saturday, saturday, MissingDatePolicy::Exclude),
            120.0
        );
        assert_eq!(range_revenue(&members, saturday, saturday), 100.0);
    }

    #[test]
    fn test_daily_revenue_missing_date_policy() {
        let members = vec![member("50", "2024-03-01"), dateless_member("40")];
        let today = day(2024, 3, 1);

        // Dateless member counts when querying today under CountAsToday
        assert_eq!(
            daily_revenue(&members, today, today, MissingDatePolicy::CountAsToday),
            90.0
        );
        assert_eq!(
            daily_revenue(&members, today, today, MissingDatePolicy::Exclude),
            50.0
        );

        // ...but not when querying a different day
        let tomorrow = day(2024, 3, 2);
        assert_eq!(
            daily_revenue(
                &members,
                day(2024, 3, 1),
                tomorrow,
                MissingDatePolicy::CountAsToday
            ),
            50.0
        );
    }

    #[test]
    fn test_daily_revenue_garbage_fee_counts_zero() {
        let members = vec![member("50", "2024-03-01"), member("abc", "2024-03-01")];
        let date = day(2024, 3, 1);
        assert_eq!(
            daily_revenue(&members, date, date, MissingDatePolicy::Exclude),
            50.0
        );
    }

    #[test]
    fn test_daily_revenue_empty_list() {
        let date = day(2024, 3, 1);
        assert_eq!(
            daily_revenue(&[], date, date, MissingDatePolicy::CountAsToday),
            0.0
        );
    }

    #[test]
    fn test_range_revenue_inclusive_bounds() {
        let members = vec![
            member("10", "2024-03-01"),
            member("20", "2024-03-15"),
            member("40", "2024-03-31"),
            member("80", "2024-04-01"),
        ];
        assert_eq!(
            range_revenue(&members, day(2024, 3, 1), day(2024, 3, 31)),
            70.0
        );
    }

    #[test]
    fn test_range_revenue_excludes_dateless() {
        let members = vec![member("10", "2024-03-15"), dateless_member("99")];
        assert_eq!(
            range_revenue(&members, day(2024, 3, 1), day(2024, 3, 31)),
            10.0
        );
    }

    #[test]
    fn test_period_comparison_doubling() {
        // current window: March (200), previous window: February (100)
        let members = vec![
            member("100", "2024-03-10"),
            member("100", "2024-03-20"),
            member("100", "2024-02-10"),
        ];
        let cmp = period_comparison(&members, day(2024, 3, 1), day(2024, 3, 29));
        assert_eq!(cmp.current, 200.0);
        assert_eq!(cmp.previous, 100.0);
        assert_eq!(cmp.percent_change, 100.0);
    }

    #[test]
    fn test_period_comparison_zero_previous() {
        let members = vec![member("100", "2024-03-10")];
        let cmp = period_comparison(&members, day(2024, 3, 1), day(2024, 3, 31));
        assert_eq!(cmp.current, 100.0);
        assert_eq!(cmp.previous, 0.0);
        assert_eq!(cmp.percent_change, 0.0);
    }

    #[test]
    fn test_period_comparison_window_alignment() {
        // A one-day window compares against exactly the preceding day
        let members = vec![member("30", "2024-03-04"), member("50", "2024-03-05")];
        let cmp = period_comparison(&members, day(2024, 3, 5), day(2024, 3, 5));
        assert_eq!(cmp.current, 50.0);
        assert_eq!(cmp.previous, 30.0);
    }

    #[test]
    fn test_monthly_trend_buckets_and_order() {
        let members = vec![
            member("10", "2023-10-05"),
            member("20", "2024-01-15"),
            member("40", "2024-03-01"),
            // Outside the 6-month window
            member("80", "2023-09-30"),
        ];
        let trend = monthly_trend(&members, day(2024, 3, 15), TREND_MONTHS);

        assert_eq!(trend.len(), 6);
        assert_eq!(trend[0].label, "Oct 2023");
        assert_eq!(trend[0].revenue, 10.0);
        assert_eq!(trend[3].label, "Jan 2024");
        assert_eq!(trend[3].revenue, 20.0);
        assert_eq!(trend[5].label, "Mar 2024");
        assert_eq!(trend[5].revenue, 40.0);
    }

    #[test]
    fn test_monthly_trend_crosses_year_boundary() {
        let members = vec![member("25", "2023-12-31")];
        let trend = monthly_trend(&members, day(2024, 1, 10), 2);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].label, "Dec 2023");
        assert_eq!(trend[0].revenue, 25.0);
        assert_eq!(trend[1].label, "Jan 2024");
        assert_eq!(trend[1].revenue, 0.0);
    }

    #[test]
    fn test_aggregators_are_idempotent() {
        let members = vec![member("50", "2024-03-01"), member("30", "2024-03-10")];
        let date = day(2024, 3, 1);
        let a = daily_revenue(&members, date, date, MissingDatePolicy::CountAsToday);
        let b = daily_revenue(&members, date, date, MissingDatePolicy::CountAsToday);
        assert_eq!(a, b);

        let r1 = range_revenue(&members, day(2024, 3, 1), day(2024, 3, 31));
        let r2 = range_revenue(&members, day(2024, 3, 1), day(2024, 3, 31));
        assert_eq!(r1, r2);
    }
}
