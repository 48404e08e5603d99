//! Per-membership-type totals.

use crate::models::Member;

#[derive(Debug, Clone, PartialEq)]
pub struct TypeBreakdown {
    pub membership_type: String,
    pub total_fee: f64,
    pub count: usize,
}

/// Group members by membership type, accumulating fee totals and head
/// counts. Groups appear in the order their type was first seen; members
/// without a type land in "Standard".
pub fn by_type(members: &[Member]) -> Vec<TypeBreakdown> {
    let mut groups: Vec<TypeBreakdown> = Vec::new();

    for member in members {
        let type_name = member.membership_type_display();
        match groups
            .iter_mut()
            .find(|g| g.membership_type == type_name)
        {
            Some(group) => {
                group.total_fee += member.fee();
                group.count += 1;
            }
            None => groups.push(TypeBreakdown {
                membership_type: type_name.to_string(),
                total_fee: member.fee(),
                count: 1,
            }),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(fee: &str, membership_type: Option<&str>) -> Member {
        let json = match membership_type {
            Some(t) => format!(
                r#"{{"first_name": "A", "last_name": "B",
                     "monthly_fee": "{}", "membership_type": "{}"}}"#,
                fee, t
            ),
            None => format!(
                r#"{{"first_name": "A", "last_name": "B", "monthly_fee": "{}"}}"#,
                fee
            ),
        };
        serde_json::from_str(&json).expect("member should parse")
    }

    #[test]
    fn test_by_type_groups_and_sums() {
        let members = vec![
            member("50", Some("Premium")),
            member("20", Some("Basic")),
            member("60", Some("Premium")),
        ];
        let groups = by_type(&members);

        assert_eq!(groups.len(), 2);
        // Insertion order follows first-seen type
        assert_eq!(groups[0].membership_type, "Premium");
        assert_eq!(groups[0].total_fee, 110.0);
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[1].membership_type, "Basic");
        assert_eq!(groups[1].count, 1);
    }

    #[test]
    fn test_by_type_defaults_missing_type() {
        let members = vec![member("30", None), member("40", Some("Standard"))];
        let groups = by_type(&members);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].membership_type, "Standard");
        assert_eq!(groups[0].total_fee, 70.0);
        assert_eq!(groups[0].count, 2);
    }

    #[test]
    fn test_by_type_empty() {
        assert!(by_type(&[]).is_empty());
    }

    #[test]
    fn test_by_type_garbage_fee_counts_member() {
        let members = vec![member("abc", Some("Basic"))];
        let groups = by_type(&members);
        assert_eq!(groups[0].total_fee, 0.0);
        assert_eq!(groups[0].count, 1);
    }
}
