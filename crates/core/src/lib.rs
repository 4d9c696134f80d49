//! Core business logic for Alianza.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `percent` - Exact conversion between display percentages and stored fractions
//! - `client` - Per-client commission split configuration
//! - `commission` - Transfer commission calculator, commission row generator, payouts
//! - `release` - Month-end release ("liberacion") rules and grouping

pub mod client;
pub mod commission;
pub mod error;
pub mod percent;
pub mod release;

pub use error::CommissionError;
