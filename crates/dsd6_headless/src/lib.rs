//! Headless session driver for automated play and CI verification.
//!
//! This crate runs a Deep Space D6 session without any presentation layer.
//! A controller drives it with JSON commands on stdin and reads one JSON
//! response per command on stdout. This enables:
//!
//! - **Scripted play**: walk the screen graph, draw cards, roll dice
//! - **CI verification**: check deck and ship bookkeeping end to end
//! - **Seed checks**: a reproducible session deals the same deck every run
//!
//! # Protocol
//!
//! Communication uses JSON lines (one JSON object per line):
//!
//! - **stdin**: Commands from the controller (fire, draw, roll, etc.)
//! - **stdout**: Responses (JSON)
//! - **stderr**: Logs (human-readable)
//!
//! See the [`protocol`] module for the full command/response format.
//!
//! # Example
//!
//! ```bash
//! # Run interactively
//! echo '{"cmd":"fire"}' | cargo run -p dsd6_headless
//!
//! # Deal a reproducible deck
//! cargo run -p dsd6_headless -- --reproducible --seed 42
//! ```

pub mod data_loader;
pub mod protocol;
pub mod runner;
pub mod session;

pub use data_loader::{default_data_dir, load_from_directory, DataLoadError, GameData};
pub use protocol::{Command, Response};
pub use runner::{HeadlessConfig, HeadlessRunner, RunnerError};
pub use session::{GameContext, GameSession, SessionConfig};
