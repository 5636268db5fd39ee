//! The gateway's HTTP layer: request handling, header transformation, and
//! the upstream client.

pub mod error;
pub mod forward;
pub mod handler;
pub mod upstream;

pub use error::ProxyError;
pub use handler::{GatewayState, proxy_handler};
pub use upstream::{UpstreamClient, UpstreamClientConfig, UpstreamRequest, UpstreamResponse};
