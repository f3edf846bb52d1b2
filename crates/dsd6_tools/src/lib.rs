//! # DSD6 Development Tools
//!
//! Command-line tools for development:
//! - Data validators
//! - Deck dumps for a given seed

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod deal;
pub mod validate;
