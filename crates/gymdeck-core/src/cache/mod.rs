//! Local caching module for offline data access.
//!
//! This module provides the `CacheManager` for storing and retrieving
//! gym data locally. Data is cached in JSON format and considered
//! stale after 60 minutes.
//!
//! Cached data types include:
//! - Members, Trainers
//! - Check-ins
//! - Products and order history
//! - Community posts

pub mod manager;

pub use manager::{CacheAges, CacheManager, CachedData};
