//! Data models for gym backend entities.
//!
//! This module contains all the data structures used to represent
//! data fetched from the gym backend:
//!
//! - `Member`: roster entry with membership and fee details
//! - `Trainer`: staff roster entry
//! - `CheckIn`: attendance record
//! - `Product`, `Order`: shop catalog and checkout results
//! - `Post`: community feed entry
//!
//! The backend's field names drift between deployments, so these structs
//! lean on serde aliases and defaults rather than strict schemas.

pub mod attendance;
pub mod member;
pub mod post;
pub mod shop;
pub mod trainer;

pub use attendance::CheckIn;
pub use member::{Member, MemberSortColumn};
pub use post::Post;
pub use shop::{Order, Product};
pub use trainer::Trainer;
