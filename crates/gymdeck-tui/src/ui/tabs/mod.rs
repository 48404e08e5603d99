//! Tab-specific content rendering.

pub mod dashboard;
pub mod members;
pub mod posts;
pub mod revenue;
pub mod shop;
