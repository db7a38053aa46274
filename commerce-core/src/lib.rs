//! commerce-core: Shared infrastructure for the commerce backend services.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
