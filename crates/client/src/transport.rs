//! HTTP plumbing shared by every service.
//!
//! A request is described once as an [`ApiRequest`] and rebuilt from
//! scratch for every attempt, so a replay after a token refresh picks up
//! the new bearer token and a fresh request id. Authentication recovery
//! lives here: an auth failure triggers a single-flight refresh and one
//! replay, and anything beyond that surfaces as
//! [`ApiError::AuthRequired`] plus an [`AuthEvent::AuthenticationLost`]
//! broadcast.

use std::sync::Arc;

use chrono::Utc;
use reqwest::{Method, header};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;
use uuid::Uuid;

use crate::error::{ApiError, ErrorBody};
use crate::events::{AuthEvent, AuthEvents};
use crate::refresh::{RefreshCoordinator, RefreshError};
use crate::session::{DEFAULT_SESSION_TTL_SECS, Session, SessionStore};
use crate::storage::StorageError;
use crate::types::RenewedToken;

// ─────────────────────────────────────────────────────────────────────────────
// Request Description
// ─────────────────────────────────────────────────────────────────────────────

/// One backend call, described independently of any attempt to send it.
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
    /// Whether an auth failure may be recovered by refreshing the token
    /// and replaying. Login and refresh calls must fail straight through.
    auth_retry: bool,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            auth_retry: true,
        }
    }

    pub(crate) fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub(crate) fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub(crate) fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub(crate) fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub(crate) fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub(crate) fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Surface auth failures unchanged instead of refreshing and
    /// replaying. Used by the auth endpoints themselves.
    pub(crate) fn no_auth_retry(mut self) -> Self {
        self.auth_retry = false;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transport
// ─────────────────────────────────────────────────────────────────────────────

/// Shared HTTP executor with authentication recovery.
#[derive(Clone)]
pub(crate) struct Transport {
    inner: Arc<TransportInner>,
}

struct TransportInner {
    http: reqwest::Client,
    base: Url,
    sessions: SessionStore,
    coordinator: RefreshCoordinator,
    events: AuthEvents,
}

impl Transport {
    pub(crate) fn new(base: Url, sessions: SessionStore, events: AuthEvents) -> Self {
        Self {
            inner: Arc::new(TransportInner {
                http: reqwest::Client::new(),
                base,
                sessions,
                coordinator: RefreshCoordinator::new(),
                events,
            }),
        }
    }

    pub(crate) fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    pub(crate) fn events(&self) -> &AuthEvents {
        &self.inner.events
    }

    /// Send `request` and decode the JSON response.
    ///
    /// On an auth failure this refreshes the session (joining a refresh
    /// already in flight) and replays the request once with the renewed
    /// token. A failed refresh or a second auth failure clears the
    /// session and returns [`ApiError::AuthRequired`]. Requests marked
    /// [`ApiRequest::no_auth_retry`] skip all of this and surface their
    /// errors unchanged.
    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, ApiError> {
        match self.attempt(&request).await {
            Err(error) if error.invites_refresh() => self.recover(request, error).await,
            outcome => outcome,
        }
    }

    /// Refresh the session, sharing any refresh already in flight.
    ///
    /// # Errors
    ///
    /// Returns the refresh failure. The session store is already cleared
    /// when this returns an error.
    pub(crate) async fn refresh(&self) -> Result<Session, RefreshError> {
        self.inner.coordinator.run(|| self.refresh_once()).await
    }

    async fn recover<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        cause: ApiError,
    ) -> Result<T, ApiError> {
        if !request.auth_retry {
            debug!(%cause, "auth failure on an auth endpoint, not refreshing");
            return Err(cause);
        }

        debug!(%cause, "authentication failed, refreshing before replay");
        if let Err(error) = self.refresh().await {
            warn!(%error, "token refresh failed");
            return Err(self.abandon(&request.path));
        }

        match self.attempt(&request).await {
            Err(error) if error.invites_refresh() => {
                warn!(%error, "replay was rejected with a fresh token");
                Err(self.abandon(&request.path))
            }
            outcome => outcome,
        }
    }

    /// Build and send one attempt. Each attempt re-reads the stored
    /// session and carries its own request id.
    async fn attempt<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ApiError> {
        let url = self.endpoint(&request.path);
        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), &url)
            .header("x-request-id", Uuid::new_v4().to_string());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(session) = self.inner.sessions.read()? {
            builder = builder.header(
                header::AUTHORIZATION,
                format!("Bearer {}", session.token),
            );
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&text)?);
        }

        let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
        Err(ApiError::Api {
            status,
            code: body.code.unwrap_or_default(),
            message: body.message.unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            }),
        })
    }

    /// Give up on the session: clear it, tell subscribers, and produce
    /// the error the caller gets.
    fn abandon(&self, path: &str) -> ApiError {
        if let Err(error) = self.inner.sessions.clear() {
            warn!(%error, "failed to clear session state");
        }
        let return_to = Some(path.to_string());
        self.inner.events.emit(AuthEvent::AuthenticationLost {
            return_to: return_to.clone(),
        });
        ApiError::AuthRequired { return_to }
    }

    /// One refresh call against the backend. Never retried; any failure
    /// clears the session and the refresh credential.
    #[instrument(skip_all)]
    async fn refresh_once(&self) -> Result<Session, RefreshError> {
        let outcome = self.try_refresh().await;
        if let Err(error) = &outcome {
            warn!(%error, "token refresh failed, clearing session state");
            if let Err(storage_error) = self.inner.sessions.clear() {
                warn!(%storage_error, "failed to clear session state");
            }
        }
        outcome
    }

    async fn try_refresh(&self) -> Result<Session, RefreshError> {
        let storage = |error: StorageError| RefreshError::Storage(error.to_string());

        let credential = self
            .inner
            .sessions
            .refresh_credential()
            .map_err(storage)?
            .ok_or(RefreshError::MissingCredential)?;
        let current = self
            .inner
            .sessions
            .read()
            .map_err(storage)?
            .ok_or(RefreshError::MissingSession)?;

        debug!("requesting a new access token");
        let response = self
            .inner
            .http
            .post(self.endpoint("/users/refreshtoken"))
            .header("x-request-id", Uuid::new_v4().to_string())
            .json(&serde_json::json!({ "refreshToken": credential.expose_secret() }))
            .send()
            .await
            .map_err(|error| RefreshError::Network(error.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|error| RefreshError::Network(error.to_string()))?;

        if !status.is_success() {
            let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
            return Err(RefreshError::Rejected {
                status: status.as_u16(),
                message: body.message.unwrap_or(text),
            });
        }

        let renewed: RenewedToken = serde_json::from_str(&text)
            .map_err(|error| RefreshError::Network(error.to_string()))?;

        let session = Session {
            token: renewed.token,
            expires_at: Utc::now().timestamp()
                + renewed.expires_in.unwrap_or(DEFAULT_SESSION_TTL_SECS),
            ..current
        };
        self.inner.sessions.write(&session).map_err(storage)?;
        if let Some(rotated) = renewed.refresh_token {
            self.inner
                .sessions
                .set_refresh_credential(&SecretString::from(rotated))
                .map_err(storage)?;
        }

        self.inner.events.emit(AuthEvent::SessionRefreshed {
            expires_at: session.expires_at,
        });
        Ok(session)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base.as_str().trim_end_matches('/'))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::MemoryStorage;

    fn transport(base: &str) -> Transport {
        Transport::new(
            Url::parse(base).unwrap(),
            SessionStore::new(Arc::new(MemoryStorage::new())),
            AuthEvents::new(),
        )
    }

    #[test]
    fn test_endpoint_joins_without_doubling_slashes() {
        let transport = transport("https://api.example.com/api/");
        assert_eq!(
            transport.endpoint("/users/login"),
            "https://api.example.com/api/users/login"
        );

        let transport = self::transport("https://api.example.com/api");
        assert_eq!(
            transport.endpoint("/books/top"),
            "https://api.example.com/api/books/top"
        );
    }

    #[test]
    fn test_request_defaults() {
        let request = ApiRequest::get("/books");
        assert_eq!(request.method, Method::GET);
        assert!(request.auth_retry);
        assert!(request.body.is_none());
        assert!(request.query.is_empty());
    }

    #[test]
    fn test_request_builder() {
        let request = ApiRequest::post("/users/login")
            .json(serde_json::json!({ "email": "ada@example.com" }))
            .no_auth_retry();
        assert_eq!(request.method, Method::POST);
        assert!(!request.auth_retry);
        assert!(request.body.is_some());

        let request = ApiRequest::get("/books")
            .query("keyword", "rust")
            .query("pageNumber", "2");
        assert_eq!(
            request.query,
            vec![
                ("keyword".to_string(), "rust".to_string()),
                ("pageNumber".to_string(), "2".to_string()),
            ]
        );
    }
}
