//! Core data models for the naming and addressing layer.
//!
//! These entities map onto the `objects`, `users` and `blacklist` tables via
//! `sqlx::FromRow` and serialize as JSON via `serde`.

pub mod blacklist;
pub mod object;
pub mod user;
