//! Scoped session observer for the application shell.
//!
//! On construction, fetches the current session once and registers a
//! long-lived listener for subsequent change events; both paths update the
//! same held value. Dropping the watcher aborts the listener, so a torn-down
//! consumer can never observe a stale update.

use std::sync::{Arc, RwLock};

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::session::{AuthChange, Session, SessionSource};

/// Holds the current session value for as long as its owner is alive.
pub struct SessionWatcher {
    current: Arc<RwLock<Option<Session>>>,
    listener: JoinHandle<()>,
}

impl SessionWatcher {
    /// Fetch the current session and start listening for changes.
    ///
    /// Must be called within a tokio runtime. The subscription is taken
    /// before the one-shot fetch so no event can fall between the two.
    pub fn spawn(source: Arc<dyn SessionSource>) -> Self {
        let mut rx = source.subscribe();

        // A failed identity fetch is "no session", not an error that
        // propagates into the consumer.
        let initial = source.fetch_session().unwrap_or_else(|e| {
            warn!(error = %e, "Session fetch failed, treating as signed out");
            None
        });

        let current = Arc::new(RwLock::new(initial));
        let slot = current.clone();
        let listener = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(change) => {
                        let next = match change {
                            AuthChange::SignedIn(s) | AuthChange::TokenRefreshed(s) => Some(s),
                            AuthChange::SignedOut => None,
                        };
                        *slot.write().expect("session slot poisoned") = next;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Session event stream lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        Self { current, listener }
    }

    /// The currently held session value.
    pub fn current(&self) -> Option<Session> {
        self.current.read().expect("session slot poisoned").clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }
}

impl Drop for SessionWatcher {
    fn drop(&mut self) {
        // Guaranteed release of the subscription with its owner.
        self.listener.abort();
    }
}
