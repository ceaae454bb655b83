//! Resilience patterns for upstream calls.
//!
//! # Design Decisions
//! - Exponential backoff with jitter after consecutive poll failures
//! - Retry-After from the upstream wins over computed backoff
//! - Backoff resets on the first success

pub mod backoff;
