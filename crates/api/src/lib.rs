//! # Agenda API
//!
//! Application layer - commands and the `agenda` binary.
//!
//! This crate contains:
//! - Commands (caller → scheduling services bridge)
//! - Application context (dependency injection)
//! - Logging setup and command execution logging
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod utils;

pub use commands::*;
pub use context::*;
