use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Deserializer, Serialize};

use crate::analytics::fees::parse_fee;

/// Length of the random part of a confirmation code
const CONFIRMATION_CODE_LEN: usize = 8;

/// Accept a price that arrives as a JSON string, a number, or null
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
pub struct Product {
    #[serde(default, alias = "product_id")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de_number_or_string")]
    pub price: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, alias = "quantity")]
    pub stock: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Product {
    /// Price as a number. Malformed or missing values count as zero.
    pub fn price_value(&self) -> f64 {
        parse_fee(self.price.as_deref())
    }

    pub fn category_display(&self) -> &str {
        self.category
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or("General")
    }

    /// Unknown stock is treated as available; the backend owns the truth
    pub fn in_stock(&self) -> bool {
        self.stock.map(|s| s > 0).unwrap_or(true)
    }

    pub fn stock_display(&self) -> String {
        match self.stock {
            Some(s) => s.to_string(),
            None => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, alias = "order_id")]
    pub id: Option<i64>,
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub confirmation_code: String,
    #[serde(default = "Utc::now")]
    pub placed_at: DateTime<Utc>,
    /// True when the order was simulated locally because the backend
    /// was unreachable
    #[serde(default)]
    pub offline: bool,
}

impl Order {
    /// Build a locally-confirmed order for the offline checkout path
    pub fn local(product: &Product, quantity: u32) -> Self {
        Self {
            id: None,
            product_id: product.id,
            product_name: product.name.clone(),
            quantity,
            total: product.price_value() * f64::from(quantity),
            confirmation_code: confirmation_code(),
            placed_at: Utc::now(),
            offline: true,
        }
    }

    pub fn code_display(&self) -> &str {
        if self.confirmation_code.is_empty() {
            "(pending)"
        } else {
            &self.confirmation_code
        }
    }
}

/// Generate a confirmation code like "GD-7K2F9QAX"
fn confirmation_code() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CONFIRMATION_CODE_LEN)
        .map(char::from)
        .collect();
    format!("GD-{}", suffix.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_product_price_variants() {
        let string_price: Product =
            serde_json::from_str(r#"{"name": "Shaker Bottle", "price": "12.50"}"#)
                .expect("product should parse");
        assert_eq!(string_price.price_value(), 12.5);

        let numeric_price: Product =
            serde_json::from_str(r#"{"name": "Protein Bar", "price": 3}"#)
                .expect("product should parse");
        assert_eq!(numeric_price.price_value(), 3.0);

        let no_price: Product =
            serde_json::from_str(r#"{"name": "Sticker"}"#).expect("product should parse");
        assert_eq!(no_price.price_value(), 0.0);
    }

    #[test]
    fn test_in_stock() {
        let p: Product = serde_json::from_str(r#"{"name": "Towel", "stock": 0}"#)
            .expect("product should parse");
        assert!(!p.in_stock());

        let unknown: Product =
            serde_json::from_str(r#"{"name": "Towel"}"#).expect("product should parse");
        assert!(unknown.in_stock());
    }

    #[test]
    fn test_local_order() {
        let p: Product = serde_json::from_str(r#"{"id": 9, "name": "Gym Tee", "price": "20"}"#)
            .expect("product should parse");
        let order = Order::local(&p, 3);

        assert_eq!(order.product_id, Some(9));
        assert_eq!(order.total, 60.0);
        assert!(order.offline);
        assert!(order.confirmation_code.starts_with("GD-"));
        assert_eq!(order.confirmation_code.len(), 3 + CONFIRMATION_CODE_LEN);
        assert!(order
            .confirmation_code
            .chars()
            .skip(3)
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
