//! Error taxonomy for the Folio API client.
//!
//! The backend reports authentication failures with a machine-readable
//! `code` field next to the human-readable `message`. Classification here
//! keys on that code contract, never on message text: only a credential
//! failure (expired/invalid/unverifiable token) makes a request eligible
//! for the refresh-and-replay protocol. Permission errors and business
//! errors pass through to the caller unchanged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::StorageError;

/// Machine-readable error codes issued by the backend.
///
/// Wire form is SCREAMING_SNAKE_CASE (e.g. `"TOKEN_EXPIRED"`). Codes the
/// client does not know fold into [`ErrorCode::Unknown`] rather than
/// failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The bearer token's lifetime has elapsed.
    TokenExpired,
    /// The bearer token failed verification.
    InvalidToken,
    /// Token processing failed for another reason.
    AuthFailed,
    /// The request carried no bearer token at all.
    NoToken,
    /// The token's subject no longer exists.
    UserNotFound,
    /// The authenticated user lacks the admin role.
    NotAdmin,
    /// The authenticated user lacks the superAdmin role.
    NotSuperAdmin,
    /// Any code this client version does not recognize.
    #[serde(other)]
    #[default]
    Unknown,
}

impl ErrorCode {
    /// Whether this code means the bearer credential itself is expired or
    /// invalid, as opposed to a permission or business failure.
    ///
    /// Only these codes make a failed request eligible for refresh:
    /// refreshing cannot help a `NotAdmin` caller or a deleted account.
    #[must_use]
    pub const fn is_credential_failure(&self) -> bool {
        matches!(self, Self::TokenExpired | Self::InvalidToken | Self::AuthFailed)
    }
}

/// Error body shape shared by every non-2xx backend response.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
    pub code: Option<ErrorCode>,
}

/// Errors that can occur when talking to the Folio API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP exchange itself failed (DNS, connect, timeout, ...).
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status of the response.
        status: reqwest::StatusCode,
        /// Machine-readable code from the error body.
        code: ErrorCode,
        /// Human-readable message from the error body.
        message: String,
    },

    /// The session could not be refreshed; the caller must log in again.
    #[error("authentication required")]
    AuthRequired {
        /// Path of the request that surfaced the failure, for the embedder
        /// to return to after a fresh login.
        return_to: Option<String>,
    },

    /// The response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reading or writing persisted client state failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Whether this failure should trigger the single-flight token refresh.
    ///
    /// True only for 401/403 responses whose code names a credential
    /// failure. Everything else (network errors, permission errors,
    /// validation errors) passes through to the caller unchanged.
    #[must_use]
    pub const fn invites_refresh(&self) -> bool {
        match self {
            Self::Api { status, code, .. } => {
                (status.as_u16() == 401 || status.as_u16() == 403)
                    && code.is_credential_failure()
            }
            _ => false,
        }
    }

    /// The HTTP status of an [`ApiError::Api`] failure, if that is what
    /// this error is.
    #[must_use]
    pub const fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
