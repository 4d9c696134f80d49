//! Commission release ("liberacion") rules.
//!
//! A release period is the set of commission rows sharing a normalized client
//! name and a month. The whole set is either held or released; the decision
//! is recomputed from scratch on every evaluation.

pub mod grouping;
pub mod rule;
pub mod schedule;

#[cfg(test)]
mod tests;

pub use grouping::{ClientNameIndex, ReleaseKey, ReleaseScope};
pub use rule::{ReleaseRule, ReleaseState, normalize_client_name};
pub use schedule::{ResolvedPeriod, resolve_batch_period};
