//! # Agenda Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite persistence (connection pool, schema, repositories)
//! - Seller notification delivery through the database outbox
//! - Configuration loading from environment and files
//!
//! ## Architecture
//! - Implements traits defined in `agenda-core`
//! - Contains all "impure" code (I/O, database, environment)

pub mod config;
pub mod database;
pub mod errors;
pub mod notifications;

pub use database::*;
pub use errors::InfraError;
pub use notifications::*;
