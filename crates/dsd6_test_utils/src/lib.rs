//! # DSD6 Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Sample catalogues and ships
//! - Recording FSM hooks
//! - Shuffle determinism harness
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;

/// Re-export proptest for convenience.
pub use proptest;
