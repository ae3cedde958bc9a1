//! Admin-side user management.

use folio_core::{Role, UserId};
use tracing::instrument;

use crate::error::ApiError;
use crate::transport::{ApiRequest, Transport};
use crate::types::{AdminInput, User, UserUpdate};

/// User accounts as managed by admins and super admins.
#[derive(Clone)]
pub struct UsersService {
    transport: Transport,
}

impl UsersService {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// List users, optionally narrowed to one role. Without a filter the
    /// backend returns everyone but the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the request
    /// fails.
    #[instrument(skip(self))]
    pub async fn list(&self, role: Option<Role>) -> Result<Vec<User>, ApiError> {
        let mut request = ApiRequest::get("/users");
        if let Some(role) = role {
            request = request.query("role", role.to_string());
        }
        self.transport.send(request).await
    }

    /// Fetch one user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist, the caller is not an
    /// admin, or the request fails.
    #[instrument(skip(self), fields(user = %id))]
    pub async fn get(&self, id: &UserId) -> Result<User, ApiError> {
        self.transport
            .send(ApiRequest::get(format!("/users/{id}")))
            .await
    }

    /// Update a user. Role changes are honored for super admins only,
    /// and a super admin cannot demote themselves.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist, the change is not
    /// allowed, or the request fails.
    #[instrument(skip_all, fields(user = %id))]
    pub async fn update(&self, id: &UserId, update: &UserUpdate) -> Result<User, ApiError> {
        let request =
            ApiRequest::put(format!("/users/{id}")).json(serde_json::to_value(update)?);
        self.transport.send(request).await
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist, the caller is not an
    /// admin, or the request fails.
    #[instrument(skip(self), fields(user = %id))]
    pub async fn remove(&self, id: &UserId) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .transport
            .send(ApiRequest::delete(format!("/users/{id}")))
            .await?;
        Ok(())
    }

    /// Create an admin account. Only super admins may create other super
    /// admins.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is taken, the role is not an admin
    /// role, the caller lacks the rank, or the request fails.
    #[instrument(skip_all, fields(email = %input.email, role = %input.role))]
    pub async fn create_admin(&self, input: &AdminInput) -> Result<User, ApiError> {
        let request = ApiRequest::post("/users/create-admin").json(serde_json::to_value(input)?);
        self.transport.send(request).await
    }
}
