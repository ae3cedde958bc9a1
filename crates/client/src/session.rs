//! Session state and its persistence.
//!
//! The session is the client's durable record of who is logged in and the
//! bearer token that proves it. It lives in storage under a fixed key, next
//! to the refresh credential under its own key, so the refresh credential
//! survives a session rewrite and can outlive an expired token.

use std::sync::Arc;

use chrono::Utc;
use folio_core::{Email, Role, UserId};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::{StorageBackend, StorageError, keys};

/// Seconds of remaining token lifetime below which a session counts as
/// stale and callers should refresh before issuing requests.
pub const FRESHNESS_MARGIN_SECS: i64 = 5 * 60;

/// Token lifetime assumed when the backend does not say how long the
/// token it issued is good for.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 24 * 60 * 60;

/// The authenticated subject and its bearer credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Backend identifier of the authenticated user.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: Email,
    /// Account role.
    pub role: Role,
    /// Bearer token attached to authenticated requests.
    pub token: String,
    /// Unix timestamp (seconds) when the bearer token expires.
    pub expires_at: i64,
}

impl Session {
    /// Check whether the bearer token has enough lifetime left to use
    /// (more than [`FRESHNESS_MARGIN_SECS`] remaining).
    ///
    /// A stale session is still readable; callers decide whether to
    /// refresh proactively or let the next request trigger it.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        let now = Utc::now().timestamp();
        self.expires_at - now > FRESHNESS_MARGIN_SECS
    }
}

/// Read/write access to the persisted session and refresh credential.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn StorageBackend>,
}

impl SessionStore {
    /// Create a store over the given backend.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    /// Read the persisted session.
    ///
    /// An expired session is still returned; expiry is the caller's check
    /// via [`Session::is_fresh`]. Corrupt JSON is self-healing: the entry
    /// is deleted and `None` returned, never an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage backend itself fails.
    pub fn read(&self) -> Result<Option<Session>, StorageError> {
        let Some(raw) = self.storage.get(keys::SESSION)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(error) => {
                warn!(%error, "stored session is corrupt, clearing it");
                self.storage.remove(keys::SESSION)?;
                Ok(None)
            }
        }
    }

    /// Persist `session`, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub fn write(&self, session: &Session) -> Result<(), StorageError> {
        let raw = serde_json::to_string(session)?;
        self.storage.set(keys::SESSION, &raw)
    }

    /// Delete the session and the refresh credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(keys::SESSION)?;
        self.storage.remove(keys::REFRESH_CREDENTIAL)
    }

    /// Read the persisted refresh credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub fn refresh_credential(&self) -> Result<Option<SecretString>, StorageError> {
        Ok(self
            .storage
            .get(keys::REFRESH_CREDENTIAL)?
            .map(SecretString::from))
    }

    /// Persist a new refresh credential, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub fn set_refresh_credential(&self, credential: &SecretString) -> Result<(), StorageError> {
        self.storage
            .set(keys::REFRESH_CREDENTIAL, credential.expose_secret())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> (Arc<MemoryStorage>, SessionStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        (storage, store)
    }

    fn session_expiring_in(secs: i64) -> Session {
        Session {
            user_id: UserId::new("u1"),
            name: "Ada".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
            role: Role::Customer,
            token: "T1".to_string(),
            expires_at: Utc::now().timestamp() + secs,
        }
    }

    #[test]
    fn test_roundtrip() {
        let (_, store) = store();
        let session = session_expiring_in(3600);

        store.write(&session).unwrap();
        assert_eq!(store.read().unwrap(), Some(session));
    }

    #[test]
    fn test_read_absent() {
        let (_, store) = store();
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_session_self_heals() {
        let (storage, store) = store();
        storage.set(keys::SESSION, "druid temple {{{").unwrap();

        assert!(store.read().unwrap().is_none());
        // The corrupt entry was purged, not just skipped.
        assert!(storage.get(keys::SESSION).unwrap().is_none());
    }

    #[test]
    fn test_expired_session_is_still_readable() {
        let (_, store) = store();
        let session = session_expiring_in(-60);

        store.write(&session).unwrap();
        let read = store.read().unwrap().unwrap();
        assert!(!read.is_fresh());
        assert_eq!(read.token, "T1");
    }

    #[test]
    fn test_freshness_margin() {
        // 4 minutes left: inside the 5 minute margin, stale.
        assert!(!session_expiring_in(4 * 60).is_fresh());
        // 10 minutes left: fresh.
        assert!(session_expiring_in(10 * 60).is_fresh());
    }

    #[test]
    fn test_clear_removes_session_and_credential() {
        let (storage, store) = store();
        store.write(&session_expiring_in(3600)).unwrap();
        store
            .set_refresh_credential(&SecretString::from("R1"))
            .unwrap();

        store.clear().unwrap();

        assert!(storage.get(keys::SESSION).unwrap().is_none());
        assert!(storage.get(keys::REFRESH_CREDENTIAL).unwrap().is_none());
    }

    #[test]
    fn test_refresh_credential_roundtrip() {
        let (_, store) = store();
        assert!(store.refresh_credential().unwrap().is_none());

        store
            .set_refresh_credential(&SecretString::from("R1"))
            .unwrap();
        let credential = store.refresh_credential().unwrap().unwrap();
        assert_eq!(credential.expose_secret(), "R1");
    }
}
