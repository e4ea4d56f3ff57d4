//! In-memory identity service backing the session guard.
//!
//! Stores users and sessions in DashMap and broadcasts session changes to
//! subscribers. Token issuance is development-grade: a random hex token with
//! a recognizable prefix.

use chrono::{Duration, Utc};
use dashmap::DashMap;
use linkbloom_core::config::AuthConfig;
use linkbloom_core::error::{LinkBloomError, LinkBloomResult};
use rand::Rng;
use std::sync::RwLock;
use tokio::sync::broadcast;
use tracing::info;
use uuid::Uuid;

use crate::session::{AuthChange, AuthProvider, Session, SessionSource};

/// Prefix for development bearer tokens.
const DEV_TOKEN_PREFIX: &str = "lb_dev_";

/// Capacity of the session-change broadcast channel.
const EVENT_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
struct UserRecord {
    user_id: Uuid,
    password: String,
}

/// Identity service: user registry, live sessions, and the session-change
/// event stream.
pub struct IdentityService {
    users: DashMap<String, UserRecord>,
    sessions: DashMap<String, Session>,
    /// Most recently established session, served by one-shot fetches.
    latest: RwLock<Option<Session>>,
    events: broadcast::Sender<AuthChange>,
    oauth_redirect_url: String,
    token_ttl: Duration,
}

impl IdentityService {
    pub fn new(config: &AuthConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            users: DashMap::new(),
            sessions: DashMap::new(),
            latest: RwLock::new(None),
            events,
            oauth_redirect_url: config.oauth_redirect_url.clone(),
            token_ttl: Duration::hours(config.token_ttl_hours.max(1)),
        }
    }

    /// Register a new account and sign it in.
    pub fn sign_up(&self, email: &str, password: &str) -> LinkBloomResult<Session> {
        if email.is_empty() || password.is_empty() {
            return Err(LinkBloomError::Auth(
                "email and password must not be empty".to_string(),
            ));
        }
        if self.users.contains_key(email) {
            return Err(LinkBloomError::Auth(format!(
                "account already exists for {email}"
            )));
        }

        let record = UserRecord {
            user_id: Uuid::new_v4(),
            password: password.to_string(),
        };
        let user_id = record.user_id;
        self.users.insert(email.to_string(), record);
        info!(email = %email, "Account created");

        Ok(self.establish(user_id, email, AuthProvider::Password))
    }

    /// Validate credentials and establish a session.
    pub fn sign_in(&self, email: &str, password: &str) -> LinkBloomResult<Session> {
        let user = self
            .users
            .get(email)
            .filter(|u| u.password == password)
            .map(|u| u.user_id)
            .ok_or_else(|| LinkBloomError::Auth("invalid credentials".to_string()))?;

        Ok(self.establish(user, email, AuthProvider::Password))
    }

    /// Begin a third-party sign-in: returns the URL the client should be
    /// redirected to. Completion of the OAuth flow is out of scope.
    pub fn sign_in_with_provider(&self, provider: &str) -> String {
        info!(provider = %provider, "Third-party sign-in requested");
        format!(
            "{}?provider={}",
            self.oauth_redirect_url.trim_end_matches('/'),
            provider
        )
    }

    /// Revoke a session. Returns `true` when the token was live.
    pub fn sign_out(&self, token: &str) -> bool {
        let removed = self.sessions.remove(token).is_some();
        if removed {
            let mut latest = self.latest.write().expect("session slot poisoned");
            if latest
                .as_ref()
                .map(|s| s.access_token == token)
                .unwrap_or(false)
            {
                *latest = None;
            }
            let _ = self.events.send(AuthChange::SignedOut);
            info!("Session revoked");
        }
        removed
    }

    /// Rotate a session's access token, emitting a refresh event.
    pub fn refresh(&self, token: &str) -> LinkBloomResult<Session> {
        let (_, old) = self
            .sessions
            .remove(token)
            .ok_or_else(|| LinkBloomError::Auth("unknown session token".to_string()))?;

        let now = Utc::now();
        let session = Session {
            access_token: generate_token(),
            issued_at: now,
            expires_at: now + self.token_ttl,
            ..old
        };
        self.sessions
            .insert(session.access_token.clone(), session.clone());
        *self.latest.write().expect("session slot poisoned") = Some(session.clone());
        let _ = self.events.send(AuthChange::TokenRefreshed(session.clone()));
        Ok(session)
    }

    /// Look up the session for a bearer token; `None` when unknown or
    /// expired.
    pub fn session_for_token(&self, token: &str) -> Option<Session> {
        self.sessions
            .get(token)
            .filter(|s| !s.is_expired(Utc::now()))
            .map(|s| s.value().clone())
    }

    fn establish(&self, user_id: Uuid, email: &str, provider: AuthProvider) -> Session {
        let now = Utc::now();
        let session = Session {
            user_id,
            email: email.to_string(),
            access_token: generate_token(),
            provider,
            issued_at: now,
            expires_at: now + self.token_ttl,
        };
        self.sessions
            .insert(session.access_token.clone(), session.clone());
        *self.latest.write().expect("session slot poisoned") = Some(session.clone());
        let _ = self.events.send(AuthChange::SignedIn(session.clone()));
        info!(user_id = %user_id, email = %email, "Session established");
        session
    }
}

impl SessionSource for IdentityService {
    fn fetch_session(&self) -> LinkBloomResult<Option<Session>> {
        Ok(self.latest.read().expect("session slot poisoned").clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.events.subscribe()
    }
}

/// Generate a random bearer token.
fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    format!(
        "{}{}",
        DEV_TOKEN_PREFIX,
        bytes
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<String>()
    )
}
