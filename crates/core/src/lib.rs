pub mod catalog;
pub mod config;
pub mod error;
pub mod types;

pub use catalog::SiteCatalog;
pub use config::AppConfig;
pub use error::{LinkBloomError, LinkBloomResult};
