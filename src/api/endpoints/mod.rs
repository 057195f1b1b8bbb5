//! HTTP endpoint handlers.

pub mod analyze;
pub mod health;
pub mod sessions;
