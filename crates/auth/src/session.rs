use chrono::{DateTime, Utc};
use linkbloom_core::error::LinkBloomResult;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// How a session was established.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthProvider {
    Password,
    OAuth(String),
}

/// An authenticated session: opaque token plus the user it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub access_token: String,
    pub provider: AuthProvider,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// A change-of-session event pushed by the identity service.
#[derive(Debug, Clone)]
pub enum AuthChange {
    SignedIn(Session),
    TokenRefreshed(Session),
    SignedOut,
}

/// Source of session state. Consumers take this as a trait object so tests
/// can inject a fake; see [`crate::watcher::SessionWatcher`].
pub trait SessionSource: Send + Sync {
    /// One-shot fetch of the current session. A failed fetch means "no
    /// session" to callers, never a panic into their view of the world.
    fn fetch_session(&self) -> LinkBloomResult<Option<Session>>;

    /// Subscribe to every subsequent change-of-session event. Dropping the
    /// receiver is the unsubscribe.
    fn subscribe(&self) -> broadcast::Receiver<AuthChange>;
}
