//! Application state management for gymdeck.
//!
//! This module contains the core `App` struct that manages all application state,
//! including UI state, cached data, session management, and background task coordination.

use std::cmp::Ordering;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use gymdeck_core::analytics::classify;
use gymdeck_core::api::ApiClient;
use gymdeck_core::auth::{CredentialStore, Session};
use gymdeck_core::cache::{CacheAges, CacheManager};
use gymdeck_core::config::Config;
use gymdeck_core::models::{CheckIn, Member, MemberSortColumn, Order, Post, Product, Trainer};
use gymdeck_core::utils::{cmp_ignore_case, contains_ignore_case};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// 32 is sufficient for a full refresh (~5 API calls) with headroom.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for username input.
/// Usernames are typically email addresses, 50 chars covers most.
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Number of items to scroll on page up/down.
/// 10 rows provides a good balance of speed without losing context.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Maximum quantity accepted by the checkout overlay
pub const MAX_CHECKOUT_QUANTITY: u32 = 99;

/// Check if a character can be added to the username field
pub fn can_add_username_char(current_len: usize, c: char) -> bool {
    current_len < MAX_USERNAME_LENGTH && !c.is_control()
}

/// Check if a character can be added to the password field
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && !c.is_control()
}

/// Password prefill for the login form: an explicit env override wins,
/// then whatever the keychain saved for the last username.
pub fn prefill_password(env_password: Option<String>, saved: Option<String>) -> String {
    env_password.or(saved).unwrap_or_default()
}

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Members,
    Revenue,
    Shop,
    Posts,
}

impl Tab {
    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Members => "Members",
            Tab::Revenue => "Revenue",
            Tab::Shop => "Shop",
            Tab::Posts => "Posts",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Dashboard => Tab::Members,
            Tab::Members => Tab::Revenue,
            Tab::Revenue => Tab::Shop,
            Tab::Shop => Tab::Posts,
            Tab::Posts => Tab::Dashboard,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Dashboard => Tab::Posts,
            Tab::Members => Tab::Dashboard,
            Tab::Revenue => Tab::Members,
            Tab::Shop => Tab::Revenue,
            Tab::Posts => Tab::Shop,
        }
    }
}

/// Current UI focus area (list panel or detail panel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Detail,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    LoggingIn,
    ConfirmingQuit,
    /// Checkout overlay on the Shop tab (quantity entry)
    ConfirmingCheckout,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Username,
    Password,
    Button,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Result types from background refresh tasks.
///
/// These variants are sent through an MPSC channel from the background refresh
/// task back to the main application. Each variant represents a different type
/// of data that was fetched from the API.
enum RefreshResult {
    Members(Vec<Member>),
    Trainers(Vec<Trainer>),
    CheckIns(Vec<CheckIn>),
    Products(Vec<Product>),
    Posts(Vec<Post>),
    /// A checkout finished (online or confirmed locally)
    OrderPlaced(Order),
    /// Signal that all refresh tasks have completed
    RefreshComplete,
    /// An error occurred during refresh
    Error(String),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: Session,
    pub api: ApiClient,
    pub cache: CacheManager,

    // UI State
    pub state: AppState,
    pub current_tab: Tab,
    pub focus: Focus,
    pub search_query: String,
    pub member_sort_column: MemberSortColumn,
    pub member_sort_ascending: bool,

    // Login form state
    pub login_username: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Selection indices
    pub member_selection: usize,
    pub product_selection: usize,
    pub post_selection: usize,

    // Checkout overlay state
    pub checkout_quantity: String,

    // Cached data
    pub members: Vec<Member>,
    pub trainers: Vec<Trainer>,
    pub checkins: Vec<CheckIn>,
    pub products: Vec<Product>,
    pub posts: Vec<Post>,
    pub orders: Vec<Order>,

    // Background task channel
    refresh_rx: Option<mpsc::Receiver<RefreshResult>>,
    refresh_tx: mpsc::Sender<RefreshResult>,

    // Status message
    pub status_message: Option<String>,

    // Cache ages for status bar
    pub cache_ages: CacheAges,

    // Offline mode - when true, only use cached data
    pub offline_mode: bool,
}

/// Build an API client honoring the env/config URL override
pub fn build_api(config: &Config) -> Result<ApiClient> {
    let url = std::env::var("GYMDECK_API_URL")
        .ok()
        .or_else(|| config.api_url.clone());

    match url {
        Some(ref u) => ApiClient::with_base_url(u),
        None => ApiClient::new(),
    }
}

impl App {
    /// Create a new application instance
    pub async fn new() -> Result<Self> {
        debug!("App::new() starting");
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };
        debug!(gym_id = ?config.gym_id, "Config loaded");

        let cache_dir = config
            .cache_dir()
            .unwrap_or_else(|_| PathBuf::from("./cache"));
        debug!(?cache_dir, "Cache directory configured");

        // Load session from disk if it exists
        let mut session = Session::new(cache_dir.clone());
        let load_result = session.load();
        debug!(?load_result, has_data = session.data.is_some(), "Session loaded");

        let mut api = build_api(&config)?;

        // If we have a valid session, set the token on the API client
        if let Some(ref data) = session.data {
            if !data.is_expired() {
                api.set_token(data.token.clone());
                debug!("Token set on API client");
            }
        }

        let cache = CacheManager::new(cache_dir)?;

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        // Get credentials from env vars, config, or the keychain
        let login_username = std::env::var("GYMDECK_USERNAME")
            .ok()
            .or_else(|| config.last_username.clone())
            .unwrap_or_default();

        let saved_password = if login_username.is_empty() {
            None
        } else {
            CredentialStore::saved_password(&login_username)
        };
        let login_password =
            prefill_password(std::env::var("GYMDECK_PASSWORD").ok(), saved_password);

        let offline_mode = config.offline_mode;

        Ok(Self {
            config,
            session,
            api,
            cache,

            state: AppState::Normal,
            current_tab: Tab::Dashboard,
            focus: Focus::List,
            search_query: String::new(),
            member_sort_column: MemberSortColumn::Name,
            member_sort_ascending: true,

            login_username,
            login_password,
            login_focus: LoginFocus::Username,
            login_error: None,

            member_selection: 0,
            product_selection: 0,
            post_selection: 0,

            checkout_quantity: String::new(),

            members: Vec::new(),
            trainers: Vec::new(),
            checkins: Vec::new(),
            products: Vec::new(),
            posts: Vec::new(),
            orders: Vec::new(),

            refresh_rx: Some(rx),
            refresh_tx: tx,

            status_message: None,
            cache_ages: Default::default(),
            offline_mode,
        })
    }

    /// Local calendar day used by all aggregate views
    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Check if the user is authenticated with a valid session
    pub fn is_authenticated(&self) -> bool {
        self.session.is_valid()
    }

    /// Attempt login with the credentials from the login form
    pub async fn attempt_login(&mut self) -> Result<()> {
        let username = self.login_username.clone();
        let password = self.login_password.clone();

        if username.is_empty() || password.is_empty() {
            self.login_error = Some("Username and password required".to_string());
            return Err(anyhow::anyhow!("Username and password required"));
        }

        self.login_error = None;

        match self.api.authenticate(&username, &password).await {
            Ok(session_data) => {
                if let Err(e) = CredentialStore::store(&username, &password) {
                    warn!(error = %e, "Failed to store credentials");
                }

                self.config.last_username = Some(username);
                self.config.gym_id = session_data.gym_id;

                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.session.update(session_data);

                if let Err(e) = self.session.save() {
                    warn!(error = %e, "Failed to save session");
                }

                if let Some(ref data) = self.session.data {
                    self.api.set_token(data.token.clone());
                }

                self.login_password.clear();
                self.state = AppState::Normal;
                info!("Login successful");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                // Provide user-friendly error messages based on error type
                let user_message = if e.to_string().contains("401")
                    || e.to_string().to_lowercase().contains("unauthorized")
                {
                    // The saved password no longer works; drop it so the
                    // next session doesn't prefill a stale one
                    if let Err(e) = CredentialStore::delete(&username) {
                        debug!(error = %e, "No stored credential to delete");
                    }
                    "Invalid username or password".to_string()
                } else if e.to_string().to_lowercase().contains("network")
                    || e.to_string().to_lowercase().contains("connect")
                {
                    "Unable to connect to server. Check your internet connection.".to_string()
                } else if e.to_string().to_lowercase().contains("timeout") {
                    "Connection timed out. Please try again.".to_string()
                } else {
                    format!("Login failed: {}", e)
                };
                self.login_error = Some(user_message);
                Err(e)
            }
        }
    }

    /// Start the login process (show login overlay)
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_focus = if self.login_username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Password
        };
        self.login_error = None;
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Load all data from cache
    pub fn load_from_cache(&mut self) -> Result<()> {
        if let Ok(Some(cached)) = self.cache.load_members() {
            self.members = cached.data;
        }

        if let Ok(Some(cached)) = self.cache.load_trainers() {
            self.trainers = cached.data;
        }

        if let Ok(Some(cached)) = self.cache.load_checkins() {
            self.checkins = cached.data;
        }

        if let Ok(Some(cached)) = self.cache.load_products() {
            self.products = cached.data;
        }

        if let Ok(Some(cached)) = self.cache.load_posts() {
            self.posts = cached.data;
        }

        if let Ok(Some(cached)) = self.cache.load_orders() {
            self.orders = cached.data;
        }

        self.cache_ages = self.cache.get_cache_ages();
        Ok(())
    }

    /// Check if any cache data is stale
    pub fn is_cache_stale(&self) -> bool {
        self.cache.any_stale()
    }

    // =========================================================================
    // Background Data Refresh
    // =========================================================================

    /// Spawn a background task to refresh all data
    pub async fn refresh_all_background(&mut self) {
        if self.offline_mode {
            self.status_message = Some("Offline mode - showing cached data".to_string());
            return;
        }

        let token = match self.session.token() {
            Some(t) => t.to_string(),
            None => {
                warn!("No token available for refresh");
                return;
            }
        };

        info!("Starting background refresh of all data");

        let api = self.api.with_token(token);
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            Self::execute_background_refresh(tx, api).await;
        });

        self.status_message = Some("Refreshing data...".to_string());
    }

    /// Toggle offline mode. Going offline keeps cached data on screen;
    /// coming back online triggers a refresh.
    pub async fn toggle_offline(&mut self) {
        self.offline_mode = !self.offline_mode;
        self.config.offline_mode = self.offline_mode;
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }

        if self.offline_mode {
            info!("Entering offline mode");
            self.status_message = Some("Offline mode - showing cached data".to_string());
        } else {
            info!("Exiting offline mode");
            self.status_message = None;
            self.refresh_all_background().await;
        }
    }

    /// Helper to send refresh results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<RefreshResult>, result: RefreshResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send refresh result - channel closed");
        }
    }

    /// Helper to send a successful fetch result or an error
    async fn send_fetch_result<T, F>(
        tx: &mpsc::Sender<RefreshResult>,
        name: &str,
        result: Result<T>,
        wrapper: F,
    ) where
        F: FnOnce(T) -> RefreshResult,
    {
        match result {
            Ok(data) => {
                debug!("{} fetched successfully", name);
                Self::send_result(tx, wrapper(data)).await;
            }
            Err(e) => {
                error!(error = %e, "{} fetch failed", name);
                Self::send_result(tx, RefreshResult::Error(format!("{}: {}", name, e))).await;
            }
        }
    }

    /// Execute the background refresh task.
    ///
    /// Runs in a spawned Tokio task and fetches all data types in parallel.
    /// Results are sent back through the MPSC channel as `RefreshResult`
    /// variants and applied (and cached) on the main loop.
    async fn execute_background_refresh(tx: mpsc::Sender<RefreshResult>, api: ApiClient) {
        info!("Background refresh task started");

        // The fetchers take &self, so a single client serves all of them;
        // reqwest multiplexes over its internal connection pool.
        let (members_res, trainers_res, checkins_res, products_res, posts_res) = tokio::join!(
            api.fetch_members(),
            api.fetch_trainers(),
            api.fetch_checkins(),
            api.fetch_products(),
            api.fetch_posts(),
        );

        Self::send_fetch_result(&tx, "Members", members_res, RefreshResult::Members).await;
        Self::send_fetch_result(&tx, "Trainers", trainers_res, RefreshResult::Trainers).await;
        Self::send_fetch_result(&tx, "Check-ins", checkins_res, RefreshResult::CheckIns).await;
        Self::send_fetch_result(&tx, "Products", products_res, RefreshResult::Products).await;
        Self::send_fetch_result(&tx, "Posts", posts_res, RefreshResult::Posts).await;

        info!("Background refresh complete");
        Self::send_result(&tx, RefreshResult::RefreshComplete).await;
    }

    /// Check for completed background tasks and process results
    pub async fn check_background_tasks(&mut self) {
        // Collect all pending results first to avoid borrow conflicts
        let results: Vec<RefreshResult> = {
            if let Some(ref mut rx) = self.refresh_rx {
                let mut results = Vec::new();
                while let Ok(result) = rx.try_recv() {
                    results.push(result);
                }
                results
            } else {
                Vec::new()
            }
        };

        for result in results {
            self.process_refresh_result(result);
        }
    }

    /// Process a single refresh result from the background task.
    ///
    /// Caches the data, then updates the corresponding app state. This is
    /// called by `check_background_tasks` for each result received.
    fn process_refresh_result(&mut self, result: RefreshResult) {
        match result {
            RefreshResult::Members(data) => {
                if let Err(e) = self.cache.save_members(&data) {
                    warn!(error = %e, "Failed to cache members data");
                }
                self.members = data;
                self.member_selection = self
                    .member_selection
                    .min(self.members.len().saturating_sub(1));
                self.cache_ages = self.cache.get_cache_ages();
            }
            RefreshResult::Trainers(data) => {
                if let Err(e) = self.cache.save_trainers(&data) {
                    warn!(error = %e, "Failed to cache trainers data");
                }
                self.trainers = data;
            }
            RefreshResult::CheckIns(data) => {
                if let Err(e) = self.cache.save_checkins(&data) {
                    warn!(error = %e, "Failed to cache check-ins data");
                }
                self.checkins = data;
                self.cache_ages = self.cache.get_cache_ages();
            }
            RefreshResult::Products(data) => {
                if let Err(e) = self.cache.save_products(&data) {
                    warn!(error = %e, "Failed to cache products data");
                }
                self.products = data;
                self.product_selection = self
                    .product_selection
                    .min(self.products.len().saturating_sub(1));
            }
            RefreshResult::Posts(data) => {
                if let Err(e) = self.cache.save_posts(&data) {
                    warn!(error = %e, "Failed to cache posts data");
                }
                self.posts = data;
                self.post_selection = self.post_selection.min(self.posts.len().saturating_sub(1));
            }
            RefreshResult::OrderPlaced(order) => {
                let note = if order.offline {
                    format!("Order confirmed locally: {}", order.code_display())
                } else {
                    format!("Order confirmed: {}", order.code_display())
                };
                // Newest orders first in the Shop tab history
                self.orders.insert(0, order);
                if let Err(e) = self.cache.save_orders(&self.orders) {
                    warn!(error = %e, "Failed to cache orders");
                }
                self.status_message = Some(note);
            }
            RefreshResult::RefreshComplete => {
                // Only clear status if it's a progress message, preserve errors
                if let Some(ref msg) = self.status_message {
                    if !msg.starts_with("Error:") {
                        self.status_message = None;
                    }
                }
            }
            RefreshResult::Error(msg) => {
                error!(error = %msg, "Background task error");
                // Simplify common error messages for the user
                let user_message = if msg.to_lowercase().contains("rate limit") {
                    "Server is busy. Please wait a moment and try again.".to_string()
                } else if msg.to_lowercase().contains("unauthorized")
                    || msg.to_lowercase().contains("401")
                {
                    "Session expired. Please log in again.".to_string()
                } else if msg.to_lowercase().contains("network")
                    || msg.to_lowercase().contains("connect")
                {
                    "Network error. Check your connection.".to_string()
                } else {
                    format!("Error: {}", msg)
                };
                self.status_message = Some(user_message);
            }
        }
    }

    // =========================================================================
    // Members Tab
    // =========================================================================

    /// Members matching the search query, in the current sort order
    pub fn visible_members(&self) -> Vec<&Member> {
        let needle = self.search_query.to_lowercase();
        let mut members: Vec<&Member> = self
            .members
            .iter()
            .filter(|m| {
                needle.is_empty()
                    || contains_ignore_case(&m.full_name(), &needle)
                    || contains_ignore_case(m.membership_type_display(), &needle)
            })
            .collect();

        let today = self.today();
        members.sort_by(|a, b| {
            let ordering = match self.member_sort_column {
                MemberSortColumn::Name => cmp_ignore_case(&a.display_name(), &b.display_name()),
                MemberSortColumn::Type => {
                    cmp_ignore_case(a.membership_type_display(), b.membership_type_display())
                }
                MemberSortColumn::Fee => {
                    a.fee().partial_cmp(&b.fee()).unwrap_or(Ordering::Equal)
                }
                MemberSortColumn::Status => classify(a, today)
                    .days_remaining
                    .cmp(&classify(b, today).days_remaining),
                MemberSortColumn::Expiry => a.expiry().cmp(&b.expiry()),
            };
            if self.member_sort_ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });

        members
    }

    /// Toggle sort: same column flips direction, new column sorts ascending
    pub fn toggle_member_sort(&mut self, column: MemberSortColumn) {
        if self.member_sort_column == column {
            self.member_sort_ascending = !self.member_sort_ascending;
        } else {
            self.member_sort_column = column;
            self.member_sort_ascending = true;
        }
        self.member_selection = 0;
    }

    // =========================================================================
    // Shop Tab
    // =========================================================================

    /// Open the checkout overlay for the selected product
    pub fn start_checkout(&mut self) {
        if self.products.get(self.product_selection).is_none() {
            return;
        }
        self.checkout_quantity = "1".to_string();
        self.state = AppState::ConfirmingCheckout;
    }

    /// Place the order for the selected product with the entered quantity.
    /// The API client falls back to a locally confirmed order when the
    /// backend is unreachable, so this works offline too.
    pub async fn confirm_checkout(&mut self) {
        let quantity: u32 = match self.checkout_quantity.trim().parse() {
            Ok(q) if (1..=MAX_CHECKOUT_QUANTITY).contains(&q) => q,
            _ => {
                self.status_message =
                    Some(format!("Quantity must be 1-{}", MAX_CHECKOUT_QUANTITY));
                return;
            }
        };

        let product = match self.products.get(self.product_selection) {
            Some(p) => p.clone(),
            None => return,
        };

        let api = match self.session.token() {
            Some(token) => self.api.with_token(token.to_string()),
            None => self.api.clone(),
        };
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            match api.checkout(&product, quantity).await {
                Ok(order) => Self::send_result(&tx, RefreshResult::OrderPlaced(order)).await,
                Err(e) => {
                    Self::send_result(&tx, RefreshResult::Error(format!("Checkout: {}", e))).await
                }
            }
        });

        self.state = AppState::Normal;
        self.status_message = Some("Placing order...".to_string());
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycle_wraps() {
        assert_eq!(Tab::Posts.next(), Tab::Dashboard);
        assert_eq!(Tab::Dashboard.prev(), Tab::Posts);

        // Full forward cycle returns to start
        let mut tab = Tab::Dashboard;
        for _ in 0..5 {
            tab = tab.next();
        }
        assert_eq!(tab, Tab::Dashboard);
    }

    #[test]
    fn test_tab_prev_inverts_next() {
        for tab in [Tab::Dashboard, Tab::Members, Tab::Revenue, Tab::Shop, Tab::Posts] {
            assert_eq!(tab.next().prev(), tab);
        }
    }

    #[test]
    fn test_username_input_limits() {
        assert!(can_add_username_char(0, 'a'));
        assert!(can_add_username_char(MAX_USERNAME_LENGTH - 1, 'a'));
        assert!(!can_add_username_char(MAX_USERNAME_LENGTH, 'a'));
        assert!(!can_add_username_char(0, '\n'));
    }

    #[test]
    fn test_password_prefill_precedence() {
        // Env override beats the keychain
        assert_eq!(
            prefill_password(Some("from-env".to_string()), Some("from-keychain".to_string())),
            "from-env"
        );
        // Keychain fills in when no override is set
        assert_eq!(
            prefill_password(None, Some("from-keychain".to_string())),
            "from-keychain"
        );
        // Nothing saved means an empty field
        assert_eq!(prefill_password(None, None), "");
    }

    #[test]
    fn test_password_input_limits() {
        assert!(can_add_password_char(0, '!'));
        assert!(!can_add_password_char(MAX_PASSWORD_LENGTH, 'x'));
        assert!(!can_add_password_char(0, '\t'));
    }
}
