//! Subcommand implementations.
//!
//! Each module owns one top-level `folio` subcommand. Output goes through
//! `tracing` so it routes through the configured subscriber.

pub mod account;
pub mod books;
pub mod cart;
pub mod dashboard;
pub mod orders;
