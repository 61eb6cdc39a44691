//! Naming, addressing and identity core of a multi-tenant file host.
//!
//! - short random file names, unique per hosting domain
//! - public URL <-> stored object resolution, with and without wildcard labels
//! - content blacklist lookups
//! - user API keys and upload quotas

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_support;
