//! Account and session commands.
//!
//! # Usage
//!
//! ```bash
//! folio account login -e reader@example.com -p hunter2
//! folio account profile
//! folio account session
//! folio account logout
//! ```

use chrono::DateTime;
use folio_client::{ApiError, Client};

/// Sign in and persist the session locally.
///
/// # Errors
///
/// Returns an error if the credentials are rejected or the request fails.
pub async fn login(client: &Client, email: &str, password: &str) -> Result<(), ApiError> {
    let session = client.account().login(email, password).await?;

    tracing::info!("Signed in as {} <{}>", session.name, session.email);
    tracing::info!("  Role: {}", session.role);
    Ok(())
}

/// Create an account and sign in.
///
/// # Errors
///
/// Returns an error if registration is rejected or the request fails.
pub async fn register(
    client: &Client,
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), ApiError> {
    let session = client.account().register(name, email, password).await?;

    tracing::info!("Account created for {} <{}>", session.name, session.email);
    tracing::info!("  Role: {}", session.role);
    Ok(())
}

/// Sign out and clear local session state.
///
/// # Errors
///
/// Returns an error only if clearing local state fails.
pub async fn logout(client: &Client) -> Result<(), ApiError> {
    client.account().logout().await?;
    tracing::info!("Signed out");
    Ok(())
}

/// Show the signed-in user's profile.
///
/// # Errors
///
/// Returns an error if the caller is not signed in or the request fails.
pub async fn profile(client: &Client) -> Result<(), ApiError> {
    let profile = client.account().profile().await?;

    tracing::info!("{} <{}>", profile.name, profile.email);
    if let Some(role) = profile.role {
        tracing::info!("  Role: {}", role);
    }
    if let Some(address) = &profile.address {
        tracing::info!("  Address: {}", address);
    }
    if let Some(phone) = &profile.phone {
        tracing::info!("  Phone: {}", phone);
    }
    Ok(())
}

/// Show the stored session, refreshing it first if it is stale.
///
/// # Errors
///
/// Returns an error if session storage fails.
pub async fn session(client: &Client) -> Result<(), ApiError> {
    match client.account().validate_session().await? {
        Some(session) => {
            tracing::info!("Signed in as {} <{}>", session.name, session.email);
            tracing::info!("  Role: {}", session.role);
            if let Some(expires) = DateTime::from_timestamp(session.expires_at, 0) {
                tracing::info!("  Token expires: {}", expires);
            }
        }
        None => tracing::info!("Not signed in. Run `folio account login` first."),
    }
    Ok(())
}
