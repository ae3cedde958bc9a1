//! Folio client SDK.
//!
//! A typed client for the Folio bookstore API. The client signs every
//! request with the persisted session's bearer token, coordinates a
//! single-flight token refresh when the backend reports an expired
//! credential, and replays interrupted requests exactly once with the new
//! token. Session, refresh credential, and cart live in a pluggable
//! [`storage::StorageBackend`] so the same SDK works from tests (in-memory)
//! and the CLI (file-backed).
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_client::{BookQuery, Client, ClientConfig};
//!
//! let config = ClientConfig::from_env()?;
//! let client = Client::new(&config);
//!
//! let session = client.account().login("ada@example.com", "secret").await?;
//! let page = client.books().search(&BookQuery::default()).await?;
//! client.cart().add(&page.books[0].id, 2)?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod cache;
pub mod cart;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod refresh;
pub mod services;
pub mod session;
pub mod storage;
mod transport;
pub mod types;

pub use cart::{CartItem, CartStore};
pub use client::Client;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use events::{AuthEvent, AuthEvents};
pub use refresh::{RefreshCoordinator, RefreshError};
pub use services::{
    AccountService, BooksService, CategoriesService, DashboardService, OrdersService,
    ReportPeriod, UsersService,
};
pub use session::{FRESHNESS_MARGIN_SECS, Session, SessionStore};
pub use storage::{FileStorage, MemoryStorage, StorageBackend, StorageError};
pub use types::*;
