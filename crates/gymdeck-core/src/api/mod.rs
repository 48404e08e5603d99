//! REST API client module for the gym backend.
//!
//! Provides the `ApiClient` for fetching roster, attendance, shop, and
//! community data, plus the mock checkout flow.
//!
//! The API uses bearer token authentication obtained through the
//! `/auth/login` endpoint.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
