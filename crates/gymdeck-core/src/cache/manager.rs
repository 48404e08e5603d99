use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{CheckIn, Member, Order, Post, Product, Trainer};

/// Consider cache stale after 1 hour.
/// Balances freshness with reducing unnecessary API calls for slowly-changing data.
const CACHE_STALE_MINUTES: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew (negative ages)
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            let remaining_mins = minutes % 60;
            if remaining_mins >= 30 {
                // Round up: 1h 30m+ becomes 2h
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            let remaining_hours = (minutes % 1440) / 60;
            if remaining_hours >= 12 {
                // Round up: 1d 12h+ becomes 2d
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }
}

pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let path = self.cache_path(name);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&path, contents)?;
        Ok(())
    }

    // ===== Members =====

    pub fn load_members(&self) -> Result<Option<CachedData<Vec<Member>>>> {
        self.load("members")
    }

    pub fn save_members(&self, members: &[Member]) -> Result<()> {
        self.save("members", &members)
    }

    // ===== Trainers =====

    pub fn load_trainers(&self) -> Result<Option<CachedData<Vec<Trainer>>>> {
        self.load("trainers")
    }

    pub fn save_trainers(&self, trainers: &[Trainer]) -> Result<()> {
        self.save("trainers", &trainers)
    }

    // ===== Check-ins =====

    pub fn load_checkins(&self) -> Result<Option<CachedData<Vec<CheckIn>>>> {
        self.load("checkins")
    }

    pub fn save_checkins(&self, checkins: &[CheckIn]) -> Result<()> {
        self.save("checkins", &checkins)
    }

    // ===== Products =====

    pub fn load_products(&self) -> Result<Option<CachedData<Vec<Product>>>> {
        self.load("products")
    }

    pub fn save_products(&self, products: &[Product]) -> Result<()> {
        self.save("products", &products)
    }

    // ===== Posts =====

    pub fn load_posts(&self) -> Result<Option<CachedData<Vec<Post>>>> {
        self.load("posts")
    }

    pub fn save_posts(&self, posts: &[Post]) -> Result<()> {
        self.save("posts", &posts)
    }

    // ===== Orders =====

    /// Order history is local-first: offline orders land here too
    pub fn load_orders(&self) -> Result<Option<CachedData<Vec<Order>>>> {
        self.load("orders")
    }

    pub fn save_orders(&self, orders: &[Order]) -> Result<()> {
        self.save("orders", &orders)
    }

    // ===== Cache Age Information =====

    /// Helper to load cache and log errors without failing
    fn load_age<T>(
        &self,
        name: &str,
        loader: impl FnOnce() -> Result<Option<CachedData<T>>>,
    ) -> Option<String> {
        match loader() {
            Ok(Some(cached)) => Some(cached.age_display()),
            Ok(None) => None,
            Err(e) => {
                debug!(cache = name, error = %e, "Failed to load cache for age display");
                None
            }
        }
    }

    pub fn get_cache_ages(&self) -> CacheAges {
        CacheAges {
            members: self.load_age("members", || self.load_members()),
            trainers: self.load_age("trainers", || self.load_trainers()),
            checkins: self.load_age("checkins", || self.load_checkins()),
            products: self.load_age("products", || self.load_products()),
            posts: self.load_age("posts", || self.load_posts()),
        }
    }

    /// Helper to check staleness and log errors without failing
    fn is_cache_stale<T>(
        &self,
        name: &str,
        loader: impl FnOnce() -> Result<Option<CachedData<T>>>,
    ) -> bool {
        match loader() {
            Ok(Some(cached)) => cached.is_stale(),
            Ok(None) => true, // No cache = stale
            Err(e) => {
                debug!(cache = name, error = %e, "Failed to load cache for staleness check");
                true // Error reading = treat as stale
            }
        }
    }

    /// Check if any of the core cached data is stale
    pub fn any_stale(&self) -> bool {
        let stale_checks = [
            self.is_cache_stale("members", || self.load_members()),
            self.is_cache_stale("trainers", || self.load_trainers()),
            self.is_cache_stale("checkins", || self.load_checkins()),
            self.is_cache_stale("products", || self.load_products()),
            self.is_cache_stale("posts", || self.load_posts()),
        ];
        stale_checks.iter().any(|&stale| stale)
    }
}

#[derive(Debug, Default)]
pub struct CacheAges {
    pub members: Option<String>,
    pub trainers: Option<String>,
    pub checkins: Option<String>,
    pub products: Option<String>,
    pub posts: Option<String>,
}

impl CacheAges {
    pub fn roster_age(&self) -> String {
        self.members
            .clone()
            .or_else(|| self.trainers.clone())
            .unwrap_or_else(|| "never".to_string())
    }

    /// Returns the most recent update time across the main cache types
    pub fn last_updated(&self) -> String {
        let ages = [&self.members, &self.checkins, &self.products];

        for a in ages.iter().copied().flatten() {
            return a.clone();
        }

        "never".to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_cached_data_age_display_just_now() {
        let cached = CachedData::new(vec![1, 2, 3]);
        assert_eq!(cached.age_display(), "just now");
    }

    #[test]
    fn test_cached_data_age_display_rounding() {
        let mut cached = CachedData::new(vec![1]);
        cached.cached_at = Utc::now() - Duration::minutes(5);
        assert_eq!(cached.age_display(), "5m ago");

        // 1h 45m rounds up to 2h
        cached.cached_at = Utc::now() - Duration::minutes(105);
        assert_eq!(cached.age_display(), "2h ago");

        // 1d 13h rounds up to 2d
        cached.cached_at = Utc::now() - Duration::minutes(1440 + 13 * 60);
        assert_eq!(cached.age_display(), "2d ago");
    }

    #[test]
    fn test_cached_data_is_stale() {
        let fresh = CachedData::new(vec![1]);
        assert!(!fresh.is_stale());

        let mut old = CachedData::new(vec![1]);
        old.cached_at = Utc::now() - Duration::minutes(61);
        assert!(old.is_stale());
    }

    #[test]
    fn test_cache_ages_last_updated_with_values() {
        let ages = CacheAges {
            members: Some("5m ago".to_string()),
            ..Default::default()
        };
        assert_eq!(ages.last_updated(), "5m ago");
        assert_eq!(ages.roster_age(), "5m ago");
    }

    #[test]
    fn test_cache_ages_last_updated_empty() {
        let ages = CacheAges::default();
        assert_eq!(ages.last_updated(), "never");
        assert_eq!(ages.roster_age(), "never");
    }
}
