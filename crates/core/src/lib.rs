//! Folio Core - Shared types library.
//!
//! This crate provides common types used across all Folio components:
//! - `client` - SDK for the Folio storefront API
//! - `cli` - Command-line storefront client
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, roles, and
//!   statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
