//! LendLens Backend Library
//!
//! Backend service and client library for browsing Kiva marketplace
//! microloans. The `loan` module carries the browsing pipeline (query,
//! transport, mapping, session state); `server` is the thin HTTP surface.

pub mod config;
pub mod error;
pub mod graphql;
pub mod loan;
pub mod middleware;
pub mod server;
