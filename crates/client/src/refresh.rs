//! Single-flight coordination for token refresh.
//!
//! Any number of requests can hit an expired token at the same time. Only
//! one refresh call may reach the backend: the first caller becomes the
//! leader and runs it, everyone else parks on a oneshot channel and gets
//! the leader's outcome fanned out to them. The outcome type is `Clone`
//! for exactly that reason.

use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tokio::sync::oneshot;
use tracing::debug;

use crate::session::Session;

/// Why a token refresh failed.
///
/// Values are cloned to every caller waiting on the same refresh, so the
/// underlying transport and storage errors are captured as strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    /// Nothing to refresh with.
    #[error("no refresh credential is stored")]
    MissingCredential,

    /// A credential exists but there is no session identity to renew.
    #[error("no session is stored")]
    MissingSession,

    /// The backend refused the refresh credential.
    #[error("refresh rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The refresh request never produced a usable response.
    #[error("refresh request failed: {0}")]
    Network(String),

    /// Reading or writing the session store failed.
    #[error("session storage failed: {0}")]
    Storage(String),

    /// The leading refresh was dropped before it completed.
    #[error("refresh was abandoned before completing")]
    Interrupted,
}

#[derive(Default)]
struct RefreshState {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<Result<Session, RefreshError>>>,
}

/// Collapses concurrent refresh attempts into a single backend call.
#[derive(Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

impl RefreshCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `refresh` unless one is already in flight, in which case wait
    /// for that one and share its outcome.
    ///
    /// The lock is only held to join or leave the flight, never across an
    /// await. A leader dropped mid-flight leaves its waiters with
    /// [`RefreshError::Interrupted`]; callers do not cancel refreshes.
    ///
    /// # Errors
    ///
    /// Returns whatever the winning refresh attempt returned.
    pub async fn run<F, Fut>(&self, refresh: F) -> Result<Session, RefreshError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Session, RefreshError>>,
    {
        // The guard's scope must end before the await below, or the
        // returned future is not `Send` (explicit `drop` is not enough
        // for the compiler's across-await liveness analysis).
        let parked = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.in_flight {
                let (sender, receiver) = oneshot::channel();
                state.waiters.push(sender);
                Some(receiver)
            } else {
                state.in_flight = true;
                None
            }
        };

        if let Some(receiver) = parked {
            debug!("refresh already in flight, waiting for its outcome");
            return match receiver.await {
                Ok(outcome) => outcome,
                Err(_) => Err(RefreshError::Interrupted),
            };
        }

        let outcome = refresh().await;

        let waiters = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.in_flight = false;
            std::mem::take(&mut state.waiters)
        };

        debug!(waiters = waiters.len(), "refresh settled, notifying waiters");
        for waiter in waiters {
            // A waiter that gave up since enqueueing is fine to skip.
            let _ = waiter.send(outcome.clone());
        }

        outcome
    }

    #[cfg(test)]
    fn pending_waiters(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .waiters
            .len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;
    use folio_core::{Email, Role, UserId};
    use tokio::sync::Notify;

    use super::*;

    fn session(token: &str) -> Session {
        Session {
            user_id: UserId::new("u1"),
            name: "Ada".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
            role: Role::Customer,
            token: token.to_string(),
            expires_at: Utc::now().timestamp() + 3600,
        }
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_refresh() {
        let coordinator = Arc::new(RefreshCoordinator::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let release = Arc::new(Notify::new());
        let (entered_tx, entered_rx) = oneshot::channel();

        let leader = tokio::spawn({
            let coordinator = Arc::clone(&coordinator);
            let calls = Arc::clone(&calls);
            let release = Arc::clone(&release);
            async move {
                coordinator
                    .run(|| async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        entered_tx.send(()).unwrap();
                        release.notified().await;
                        Ok(session("T2"))
                    })
                    .await
            }
        });

        // Wait until the leader is inside its refresh before piling on.
        entered_rx.await.unwrap();

        let mut waiters = Vec::new();
        for _ in 0..4 {
            let coordinator = Arc::clone(&coordinator);
            let calls = Arc::clone(&calls);
            waiters.push(tokio::spawn(async move {
                coordinator
                    .run(|| async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(session("T3"))
                    })
                    .await
            }));
        }

        while coordinator.pending_waiters() < 4 {
            tokio::task::yield_now().await;
        }
        release.notify_waiters();

        assert_eq!(leader.await.unwrap().unwrap().token, "T2");
        for waiter in waiters {
            assert_eq!(waiter.await.unwrap().unwrap().token, "T2");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_fans_out_to_every_waiter() {
        let coordinator = Arc::new(RefreshCoordinator::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let release = Arc::new(Notify::new());
        let (entered_tx, entered_rx) = oneshot::channel();

        let leader = tokio::spawn({
            let coordinator = Arc::clone(&coordinator);
            let calls = Arc::clone(&calls);
            let release = Arc::clone(&release);
            async move {
                coordinator
                    .run(|| async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        entered_tx.send(()).unwrap();
                        release.notified().await;
                        Err(RefreshError::Rejected {
                            status: 401,
                            message: "refresh token expired".to_string(),
                        })
                    })
                    .await
            }
        });

        entered_rx.await.unwrap();

        let waiter = tokio::spawn({
            let coordinator = Arc::clone(&coordinator);
            let calls = Arc::clone(&calls);
            async move {
                coordinator
                    .run(|| async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(session("T3"))
                    })
                    .await
            }
        });

        while coordinator.pending_waiters() < 1 {
            tokio::task::yield_now().await;
        }
        release.notify_waiters();

        let expected = RefreshError::Rejected {
            status: 401,
            message: "refresh token expired".to_string(),
        };
        assert_eq!(leader.await.unwrap().unwrap_err(), expected);
        assert_eq!(waiter.await.unwrap().unwrap_err(), expected);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sequential_runs_each_execute() {
        let coordinator = RefreshCoordinator::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let outcome = coordinator
                .run(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(session("T2"))
                })
                .await;
            assert!(outcome.is_ok());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
