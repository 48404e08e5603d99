//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use gymdeck_core::models::MemberSortColumn;

use crate::app::{
    can_add_password_char, can_add_username_char, App, AppState, Focus, LoginFocus, Tab,
    PAGE_SCROLL_SIZE,
};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle login overlay
    if matches!(app.state, AppState::LoggingIn) {
        return handle_login_input(app, key).await;
    }

    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle checkout overlay
    if matches!(app.state, AppState::ConfirmingCheckout) {
        return handle_checkout_input(app, key).await;
    }

    // Handle search mode
    if matches!(app.state, AppState::Searching) {
        return handle_search_input(app, key);
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char('1') => {
            app.current_tab = Tab::Dashboard;
            app.focus = Focus::List;
        }
        KeyCode::Char('2') => {
            app.current_tab = Tab::Members;
            app.focus = Focus::List;
        }
        KeyCode::Char('3') => {
            app.current_tab = Tab::Revenue;
            app.focus = Focus::List;
        }
        KeyCode::Char('4') => {
            app.current_tab = Tab::Shop;
            app.focus = Focus::List;
        }
        KeyCode::Char('5') => {
            app.current_tab = Tab::Posts;
            app.focus = Focus::List;
        }
        KeyCode::Left => {
            app.current_tab = app.current_tab.prev();
            app.focus = Focus::List;
        }
        KeyCode::Right => {
            app.current_tab = app.current_tab.next();
            app.focus = Focus::List;
        }
        KeyCode::Char('r') => {
            if !app.offline_mode {
                app.refresh_all_background().await;
            }
        }
        KeyCode::Char('o') => {
            app.toggle_offline().await;
        }
        KeyCode::Char('/') if app.current_tab == Tab::Members => {
            app.state = AppState::Searching;
            app.search_query.clear();
        }
        KeyCode::Tab => {
            // Toggle focus between list and detail panels
            app.focus = match app.focus {
                Focus::List => Focus::Detail,
                Focus::Detail => Focus::List,
            };
        }
        KeyCode::Esc => {
            app.search_query.clear();
            app.focus = Focus::List;
        }
        _ => {
            // Tab-specific input
            match app.current_tab {
                Tab::Dashboard => {}
                Tab::Members => handle_members_input(app, key),
                Tab::Revenue => {}
                Tab::Shop => handle_shop_input(app, key),
                Tab::Posts => handle_posts_input(app, key),
            }
        }
    }

    Ok(false)
}

fn handle_search_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.search_query.clear();
        }
        KeyCode::Enter => {
            app.state = AppState::Normal;
            // Keep search query active
        }
        KeyCode::Backspace => {
            app.search_query.pop();
        }
        KeyCode::Char(c) => {
            app.search_query.push(c);
            // Reset selection when search changes
            app.member_selection = 0;
        }
        _ => {}
    }
    Ok(false)
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Down | KeyCode::Tab => {
            // Move to next field
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Username,
            };
        }
        KeyCode::Up | KeyCode::BackTab => {
            // Move to previous field
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Username,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => {
            match app.login_focus {
                LoginFocus::Username => {
                    app.login_focus = LoginFocus::Password;
                }
                LoginFocus::Password => {
                    app.login_focus = LoginFocus::Button;
                }
                LoginFocus::Button => {
                    // Attempt login
                    let _ = app.attempt_login().await;
                    // If successful, state will be Normal
                    // If failed, login_error will be set
                    if app.state == AppState::Normal {
                        app.refresh_all_background().await;
                    }
                }
            }
        }
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Username => {
                app.login_username.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Username => {
                if can_add_username_char(app.login_username.len(), c) {
                    app.login_username.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.len(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {
                // Ignore character input on button
            }
        },
        _ => {}
    }
    Ok(false)
}

async fn handle_checkout_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.checkout_quantity.clear();
        }
        KeyCode::Enter => {
            app.confirm_checkout().await;
        }
        KeyCode::Backspace => {
            app.checkout_quantity.pop();
        }
        // Quantity is at most two digits
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if app.checkout_quantity.len() < 2 {
                app.checkout_quantity.push(c);
            }
        }
        _ => {}
    }
    Ok(false)
}

fn handle_members_input(app: &mut App, key: KeyEvent) {
    let max_index = app.visible_members().len().saturating_sub(1);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.member_selection = (app.member_selection + 1).min(max_index);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.member_selection = app.member_selection.saturating_sub(1);
        }
        KeyCode::Home => {
            app.member_selection = 0;
        }
        KeyCode::End => {
            app.member_selection = max_index;
        }
        KeyCode::PageDown => {
            app.member_selection = (app.member_selection + PAGE_SCROLL_SIZE).min(max_index);
        }
        KeyCode::PageUp => {
            app.member_selection = app.member_selection.saturating_sub(PAGE_SCROLL_SIZE);
        }
        KeyCode::Enter => {
            app.focus = Focus::Detail;
        }
        // Sort keys (only in list focus)
        KeyCode::Char('n') if app.focus == Focus::List => {
            app.toggle_member_sort(MemberSortColumn::Name);
        }
        KeyCode::Char('t') if app.focus == Focus::List => {
            app.toggle_member_sort(MemberSortColumn::Type);
        }
        KeyCode::Char('f') if app.focus == Focus::List => {
            app.toggle_member_sort(MemberSortColumn::Fee);
        }
        KeyCode::Char('s') if app.focus == Focus::List => {
            app.toggle_member_sort(MemberSortColumn::Status);
        }
        KeyCode::Char('e') if app.focus == Focus::List => {
            app.toggle_member_sort(MemberSortColumn::Expiry);
        }
        _ => {}
    }
}

fn handle_shop_input(app: &mut App, key: KeyEvent) {
    let max_index = app.products.len().saturating_sub(1);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.product_selection = (app.product_selection + 1).min(max_index);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.product_selection = app.product_selection.saturating_sub(1);
        }
        KeyCode::Home => {
            app.product_selection = 0;
        }
        KeyCode::End => {
            app.product_selection = max_index;
        }
        KeyCode::PageDown => {
            app.product_selection = (app.product_selection + PAGE_SCROLL_SIZE).min(max_index);
        }
        KeyCode::PageUp => {
            app.product_selection = app.product_selection.saturating_sub(PAGE_SCROLL_SIZE);
        }
        KeyCode::Enter => {
            app.start_checkout();
        }
        _ => {}
    }
}

fn handle_posts_input(app: &mut App, key: KeyEvent) {
    let max_index = app.posts.len().saturating_sub(1);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.post_selection = (app.post_selection + 1).min(max_index);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.post_selection = app.post_selection.saturating_sub(1);
        }
        KeyCode::Home => {
            app.post_selection = 0;
        }
        KeyCode::End => {
            app.post_selection = max_index;
        }
        KeyCode::PageDown => {
            app.post_selection = (app.post_selection + PAGE_SCROLL_SIZE).min(max_index);
        }
        KeyCode::PageUp => {
            app.post_selection = app.post_selection.saturating_sub(PAGE_SCROLL_SIZE);
        }
        KeyCode::Enter => {
            app.focus = Focus::Detail;
        }
        _ => {}
    }
}
