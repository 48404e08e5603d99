//! Core library for gymdeck.
//!
//! Everything the terminal client needs short of rendering lives here:
//!
//! - `api`: REST client for the gym backend
//! - `models`: member, trainer, attendance, shop, and post data structures
//! - `analytics`: membership status and revenue aggregation over fetched data
//! - `auth`: session management and OS keychain credential storage
//! - `cache`: JSON snapshot cache for offline use
//! - `config`: persistent application configuration

pub mod analytics;
pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod utils;
