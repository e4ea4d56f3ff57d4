//! Authentication: in-memory identity service, session-change event stream,
//! and the session guard gating protected routes.
//!
//! Development: accepts any signup, returns dev-prefixed bearer tokens.
//! Production: replace with JWT + a hosted identity provider.

pub mod guard;
pub mod identity;
pub mod session;
pub mod watcher;

pub use guard::{session_guard, GuardState};
pub use identity::IdentityService;
pub use session::{AuthChange, Session, SessionSource};
pub use watcher::SessionWatcher;
