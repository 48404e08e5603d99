//! Tolerant fee parsing and summing.
//!
//! Fees arrive from the backend as numbers, numeric strings, or garbage.
//! Aggregation never fails on bad input: anything that doesn't parse
//! contributes zero and the rest of the list still counts.

use crate::models::Member;

/// Parse a fee value. Missing or malformed input counts as zero.
/// Negative fees pass through as-is; refunds are the backend's business.
pub fn parse_fee(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Sum monthly fees across a member list
pub fn sum_fees<'a, I>(members: I) -> f64
where
    I: IntoIterator<Item = &'a Member>,
{
    members.into_iter().map(|m| m.fee()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(fee: &str) -> Member {
        serde_json::from_str(&format!(
            r#"{{"first_name": "A", "last_name": "B", "monthly_fee": "{}"}}"#,
            fee
        ))
        .expect("member should parse")
    }

    #[test]
    fn test_parse_fee() {
        assert_eq!(parse_fee(Some("49.99")), 49.99);
        assert_eq!(parse_fee(Some(" 65 ")), 65.0);
        assert_eq!(parse_fee(Some("abc")), 0.0);
        assert_eq!(parse_fee(Some("")), 0.0);
        assert_eq!(parse_fee(Some("NaN")), 0.0);
        assert_eq!(parse_fee(None), 0.0);
        // Negative fees are not guarded
        assert_eq!(parse_fee(Some("-10")), -10.0);
    }

    #[test]
    fn test_sum_fees_empty() {
        let members: Vec<Member> = vec![];
        assert_eq!(sum_fees(&members), 0.0);
    }

    #[test]
    fn test_sum_fees_skips_garbage() {
        let members = vec![member("50"), member("abc"), member("30")];
        assert_eq!(sum_fees(&members), 80.0);
    }

    #[test]
    fn test_sum_fees_negative_passthrough() {
        let members = vec![member("100"), member("-25")];
        assert_eq!(sum_fees(&members), 75.0);
    }
}
