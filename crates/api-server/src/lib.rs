//! REST API for the LinkBloom campaign service — in-memory store, handlers,
//! router, and the HTTP server.

pub mod handlers;
pub mod models;
pub mod router;
pub mod server;
pub mod store;

pub use handlers::AppState;
pub use router::app_router;
pub use server::ApiServer;
pub use store::AppStore;
