//! The top-level client.
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_client::{Client, ClientConfig};
//!
//! let config = ClientConfig::from_env()?;
//! let client = Client::new(&config);
//!
//! let session = client.account().login("ada@example.com", "secret").await?;
//! let page = client.books().search(&Default::default()).await?;
//! ```

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::cart::CartStore;
use crate::config::ClientConfig;
use crate::events::{AuthEvent, AuthEvents};
use crate::services::{
    AccountService, BooksService, CategoriesService, DashboardService, OrdersService,
    UsersService,
};
use crate::session::SessionStore;
use crate::storage::{FileStorage, MemoryStorage, StorageBackend};
use crate::transport::Transport;

/// Client for the bookstore backend.
///
/// Cheap to clone; all clones share the same session state, caches, and
/// refresh coordination.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    account: AccountService,
    books: BooksService,
    categories: CategoriesService,
    orders: OrdersService,
    users: UsersService,
    dashboard: DashboardService,
    cart: CartStore,
    events: AuthEvents,
}

impl Client {
    /// Create a client. Session and cart state go to the configured
    /// state file, or stay in memory when none is configured.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        let storage: Arc<dyn StorageBackend> = match &config.state_file {
            Some(path) => Arc::new(FileStorage::new(path)),
            None => Arc::new(MemoryStorage::new()),
        };
        Self::with_storage(config, storage)
    }

    /// Create a client over a caller-provided storage backend.
    #[must_use]
    pub fn with_storage(config: &ClientConfig, storage: Arc<dyn StorageBackend>) -> Self {
        let events = AuthEvents::new();
        let sessions = SessionStore::new(Arc::clone(&storage));
        let transport = Transport::new(config.api_url.clone(), sessions, events.clone());

        Self {
            inner: Arc::new(ClientInner {
                account: AccountService::new(transport.clone()),
                books: BooksService::new(transport.clone()),
                categories: CategoriesService::new(transport.clone()),
                orders: OrdersService::new(transport.clone()),
                users: UsersService::new(transport.clone()),
                dashboard: DashboardService::new(transport),
                cart: CartStore::new(storage),
                events,
            }),
        }
    }

    #[must_use]
    pub fn account(&self) -> &AccountService {
        &self.inner.account
    }

    #[must_use]
    pub fn books(&self) -> &BooksService {
        &self.inner.books
    }

    #[must_use]
    pub fn categories(&self) -> &CategoriesService {
        &self.inner.categories
    }

    #[must_use]
    pub fn orders(&self) -> &OrdersService {
        &self.inner.orders
    }

    #[must_use]
    pub fn users(&self) -> &UsersService {
        &self.inner.users
    }

    #[must_use]
    pub fn dashboard(&self) -> &DashboardService {
        &self.inner.dashboard
    }

    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Subscribe to authentication lifecycle events.
    #[must_use]
    pub fn auth_events(&self) -> broadcast::Receiver<AuthEvent> {
        self.inner.events.subscribe()
    }
}
