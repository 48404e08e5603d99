//! Membership status and revenue aggregation.
//!
//! Everything in this module is a pure function over the already-fetched
//! member list: no I/O, no stored state, recomputed on every call. The
//! entry points take `today` (or explicit range bounds) as arguments so
//! the same inputs always produce the same outputs.
//!
//! - `dates`: calendar-day matching and inclusive range tests
//! - `fees`: tolerant fee parsing and summing
//! - `classify`: Active / ExpiringSoon / Expired status
//! - `revenue`: daily, range, period-comparison and trend revenue
//! - `breakdown`: per-membership-type totals

pub mod breakdown;
pub mod classify;
pub mod dates;
pub mod fees;
pub mod revenue;

pub use breakdown::{by_type, TypeBreakdown};
pub use classify::{classify, Classification, MembershipStatus};
pub use revenue::{
    daily_revenue, monthly_trend, period_comparison, range_revenue, MissingDatePolicy,
    MonthRevenue, PeriodComparison, TREND_MONTHS,
};
