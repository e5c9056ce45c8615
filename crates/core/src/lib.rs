//! Core business logic for Ohada.
//!
//! This crate contains pure business logic with ZERO I/O: no logging, no
//! file or network access. All aging types, validation rules, and
//! provisioning calculations live here.
//!
//! # Modules
//!
//! - `aging` - Aged balances, age buckets and regulatory provisions

pub mod aging;
