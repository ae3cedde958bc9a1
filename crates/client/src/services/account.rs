//! Authentication and the signed-in user's own account.

use chrono::Utc;
use folio_core::Role;
use secrecy::SecretString;
use tracing::{debug, instrument, warn};

use crate::error::ApiError;
use crate::session::{DEFAULT_SESSION_TTL_SECS, Session};
use crate::transport::{ApiRequest, Transport};
use crate::types::{AuthenticatedUser, ProfileUpdate, UserProfile};

/// Login, registration, logout, and session upkeep.
#[derive(Clone)]
pub struct AccountService {
    transport: Transport,
}

impl AccountService {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Sign in with email and password and persist the resulting session.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request
    /// fails. A rejected login never clears an existing session.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let request = ApiRequest::post("/users/login")
            .json(serde_json::json!({ "email": email, "password": password }))
            .no_auth_retry();

        let user: AuthenticatedUser = self.transport.send(request).await?;
        self.persist(user)
    }

    /// Create an account and persist the resulting session.
    ///
    /// # Errors
    ///
    /// Returns an error if registration is rejected or the request fails.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, ApiError> {
        let request = ApiRequest::post("/users")
            .json(serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
            }))
            .no_auth_retry();

        let user: AuthenticatedUser = self.transport.send(request).await?;
        self.persist(user)
    }

    /// Sign out. The backend call is best effort; local session state is
    /// cleared no matter what.
    ///
    /// # Errors
    ///
    /// Returns an error only if clearing local state fails.
    #[instrument(skip_all)]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let request = ApiRequest::post("/users/logout").no_auth_retry();
        if let Err(error) = self.transport.send::<serde_json::Value>(request).await {
            debug!(%error, "logout request failed, clearing local state anyway");
        }
        self.transport.sessions().clear()?;
        Ok(())
    }

    /// The stored session, if any, without checking freshness.
    ///
    /// # Errors
    ///
    /// Returns an error if session storage fails.
    pub fn current_session(&self) -> Result<Option<Session>, ApiError> {
        Ok(self.transport.sessions().read()?)
    }

    /// A session that is safe to issue requests with.
    ///
    /// A fresh stored session is returned as is. A stale or missing one
    /// is refreshed when a refresh credential is on hand. `None` means
    /// the user has to log in again.
    ///
    /// # Errors
    ///
    /// Returns an error if session storage fails. A failed refresh is
    /// not an error here; it clears local state and yields `None`.
    #[instrument(skip_all)]
    pub async fn validate_session(&self) -> Result<Option<Session>, ApiError> {
        let sessions = self.transport.sessions();

        if let Some(session) = sessions.read()?
            && session.is_fresh()
        {
            return Ok(Some(session));
        }

        if sessions.refresh_credential()?.is_none() {
            return Ok(None);
        }

        debug!("session is stale or missing, refreshing");
        match self.transport.refresh().await {
            Ok(session) => Ok(Some(session)),
            Err(error) => {
                warn!(%error, "could not refresh the session");
                Ok(None)
            }
        }
    }

    /// The signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not authenticated or the
    /// request fails.
    #[instrument(skip_all)]
    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.transport.send(ApiRequest::get("/users/profile")).await
    }

    /// Update the signed-in user's profile and fold any rotated bearer
    /// token into the stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected or the request fails.
    #[instrument(skip_all)]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        let request = ApiRequest::put("/users/profile").json(serde_json::to_value(update)?);
        let profile: UserProfile = self.transport.send(request).await?;

        let sessions = self.transport.sessions();
        if let Some(mut session) = sessions.read()? {
            session.name = profile.name.clone();
            session.email = profile.email.clone();
            if let Some(role) = profile.role {
                session.role = role;
            }
            if let Some(token) = &profile.token {
                session.token = token.clone();
            }
            sessions.write(&session)?;
        }

        Ok(profile)
    }

    /// Build and persist a session from a login or registration payload.
    fn persist(&self, user: AuthenticatedUser) -> Result<Session, ApiError> {
        let role = user.role.unwrap_or(if user.is_admin.unwrap_or(false) {
            Role::Admin
        } else {
            Role::Customer
        });

        let session = Session {
            user_id: user.id,
            name: user.name,
            email: user.email,
            role,
            token: user.token,
            expires_at: Utc::now().timestamp()
                + user.expires_in.unwrap_or(DEFAULT_SESSION_TTL_SECS),
        };

        let sessions = self.transport.sessions();
        sessions.write(&session)?;
        if let Some(credential) = user.refresh_token {
            sessions.set_refresh_credential(&SecretString::from(credential))?;
        }

        Ok(session)
    }
}
