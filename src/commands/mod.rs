//! Command implementations for the CLI
//!
//! - serve: Start the HTTP API
//! - calculate: One-shot savings comparison
//! - catalog: Brand and model listings
//! - config: Show or validate configuration

pub mod calculate;
pub mod catalog;
pub mod config;
pub mod serve;
