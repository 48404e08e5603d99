use serde::{Deserialize, Serialize};

use crate::utils::format_phone;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trainer {
    #[serde(default, alias = "trainer_id")]
    pub id: Option<i64>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, alias = "speciality")]
    pub specialty: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "phone_number")]
    pub phone: Option<String>,
}

impl Trainer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn specialty_display(&self) -> &str {
        self.specialty
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("General fitness")
    }

    pub fn phone_display(&self) -> Option<String> {
        self.phone
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(format_phone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trainer_with_alias() {
        let json = r#"{"trainer_id": 3, "first_name": "Dana", "last_name": "Cho",
                       "speciality": "Powerlifting"}"#;
        let t: Trainer = serde_json::from_str(json).expect("trainer should parse");
        assert_eq!(t.id, Some(3));
        assert_eq!(t.specialty_display(), "Powerlifting");
    }

    #[test]
    fn test_specialty_default() {
        let t: Trainer = serde_json::from_str(r#"{"first_name": "D", "last_name": "C"}"#)
            .expect("trainer should parse");
        assert_eq!(t.specialty_display(), "General fitness");
    }
}
