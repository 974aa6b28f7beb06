// proxy module - GitLab API reverse proxy service

pub mod config;
pub mod error;
pub mod server;

pub mod common; // Path codec, query params, credential policy
pub mod handlers; // API endpoint handlers
pub mod middleware; // Axum middleware
pub mod upstream; // Upstream client and pagination

pub use config::{GitLabConfig, ServerConfig};
pub use error::ProxyError;
pub use server::{AppState, AxumServer};
