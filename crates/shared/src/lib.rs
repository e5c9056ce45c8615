//! Shared types, errors, and configuration for Ohada.
//!
//! This crate provides common types used across all other crates:
//! - Minor-unit amounts and ISO currency codes
//! - Typed identifiers for ledger items and counterparties
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
