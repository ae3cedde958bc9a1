//! Integration tests for the Folio client.
//!
//! Every test stands up its own [`wiremock::MockServer`] and points a
//! [`Client`] at it over in-memory storage, so the full stack short of
//! the real backend is exercised: request building, bearer injection,
//! the refresh interceptor, caching, and state persistence.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p folio-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth_refresh` - Token refresh, replay, and give-up behavior
//! - `account_session` - Login, logout, and session validation flows
//! - `catalog_cache` - Read-through caching of catalog lookups
//! - `service_payloads` - Request and response mapping per service

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use chrono::Utc;
use folio_client::{Client, ClientConfig, MemoryStorage, Session, SessionStore, StorageBackend};
use folio_core::{Email, Role, UserId};
use secrecy::SecretString;
use wiremock::MockServer;

/// A mock backend plus a client wired to it over in-memory storage.
pub struct TestContext {
    pub server: MockServer,
    pub client: Client,
    storage: Arc<MemoryStorage>,
}

impl TestContext {
    /// Start a mock server and a fresh client pointed at it.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URL is not a valid API base URL.
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let config = ClientConfig::new(&server.uri()).expect("mock server URL is valid");
        let storage = Arc::new(MemoryStorage::new());
        let client =
            Client::with_storage(&config, Arc::clone(&storage) as Arc<dyn StorageBackend>);
        Self {
            server,
            client,
            storage,
        }
    }

    /// Direct access to the session state underneath the client.
    #[must_use]
    pub fn sessions(&self) -> SessionStore {
        SessionStore::new(Arc::clone(&self.storage) as Arc<dyn StorageBackend>)
    }

    /// Store a signed-in session with the given bearer token and remaining
    /// lifetime, plus a refresh credential.
    ///
    /// # Panics
    ///
    /// Panics if storage fails, which in-memory storage never does.
    pub fn seed_session(&self, token: &str, credential: &str, ttl_secs: i64) {
        let sessions = self.sessions();
        sessions
            .write(&session(token, ttl_secs))
            .expect("session write");
        sessions
            .set_refresh_credential(&SecretString::from(credential))
            .expect("credential write");
    }
}

/// A session for `token` expiring `ttl_secs` from now.
#[must_use]
pub fn session(token: &str, ttl_secs: i64) -> Session {
    Session {
        user_id: UserId::new("665f1c2e9b1d8c3a5e7f0a12"),
        name: "Ada Lovelace".to_string(),
        email: Email::parse("ada@example.com").expect("valid email"),
        role: Role::Customer,
        token: token.to_string(),
        expires_at: Utc::now().timestamp() + ttl_secs,
    }
}

/// A book the way the backend sends it, with `id` and `title` plugged in.
#[must_use]
pub fn book_json(id: &str, title: &str) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "user": "665f1c2e9b1d8c3a5e7f0a10",
        "title": title,
        "author": "Jo March",
        "image": "/images/book.jpg",
        "category": { "_id": "cat1", "name": "Fiction" },
        "description": "A story.",
        "approved": true,
        "reviews": [],
        "rating": 4.2,
        "numReviews": 11,
        "price": 13.49,
        "countInStock": 5,
        "language": "English",
        "format": "Paperback",
        "isBestseller": false,
        "isNewRelease": false,
        "isSpecialOffer": false,
        "discountPercentage": 0,
        "genres": ["fiction"],
        "createdAt": "2026-01-04T09:30:00.000Z",
        "updatedAt": "2026-01-04T09:30:00.000Z"
    })
}
