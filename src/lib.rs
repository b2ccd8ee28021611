//! Weekly squad rotation.
//!
//! Splits a roster into a fixed number of squads each week. Every squad
//! gets one leader chosen under cooldown rules; everyone else is ordered by
//! display priority, and configured divide pairs never share a squad.
//!
//! # Modules
//!
//! - **`models`**: `Member`, `TeamHistory`, `SquadMatrix`, `DividePair`
//! - **`generation`**: the pipeline (cooldown pools, leader sampling,
//!   priority ordering, partitioning, divide-pair resolution)
//! - **`service`**: per-label idempotent generation and cloning
//! - **`store`**: roster/history traits with in-memory and SQLite stores
//! - **`config`**: `SquadConfig` loaded from TOML
//! - **`week`**: Monday anchoring and month-relative week labels
//! - **`validation`**: roster integrity checks
//! - **`render`**: plain-text squad table
//!
//! # Architecture
//!
//! The generation pipeline is pure: it takes a roster, a date, settings
//! and an RNG, and returns a `SquadMatrix`. Storage and leadership
//! bookkeeping live in `service` and `store`.

pub mod config;
pub mod error;
pub mod generation;
pub mod models;
pub mod render;
pub mod service;
pub mod store;
pub mod validation;
pub mod week;

pub use error::{Result, SquadError};
