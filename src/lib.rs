//! Typed client for the monday.com GraphQL API.
//!
//! Every request goes through a client-side [`ratelimit::RateLimiter`] that
//! enforces a rolling per-minute cap and a per-day cap while keeping its own
//! bookkeeping bounded over arbitrarily long process lifetimes.

pub mod boards;
pub mod columns;
pub mod config;
pub mod error;
pub mod graphql;
pub mod items;
pub mod metrics;
pub mod ratelimit;
pub mod users;
pub mod validator;
pub mod workspaces;

pub use config::{ApiConfig, Config, OverflowMode, RateLimitConfig};
pub use error::MondayError;
pub use graphql::MondayClient;
pub use ratelimit::{RateLimiter, SharedRateLimiter, UsageStats};
