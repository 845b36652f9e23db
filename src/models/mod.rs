//! Data models for the top 100 repositories tracker.
//!
//! Wire shapes mirror the columns of the `top100` and `activity` tables
//! exactly, so rows serialize straight into the API responses.

mod activity;
mod repository;

pub use activity::*;
pub use repository::*;
