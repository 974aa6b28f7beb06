// Upstream GitLab API access

pub mod client;
pub mod link;
pub mod request;

pub use client::UpstreamClient;
pub use request::UpstreamRequest;
