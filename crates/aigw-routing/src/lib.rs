//! Request routing for the gateway.
//!
//! This crate is pure: it turns an inbound URL path into a [`RouteTarget`]
//! describing the upstream origin, without performing any IO. The HTTP layer
//! lives in `aigw-core`.

pub mod decision;
pub mod headers;
pub mod path;
pub mod registry;
pub mod strategy;
pub mod validate;

pub use decision::{RouteError, RouteTarget, RouteTargetBuilder};
pub use headers::{Headers, header_add_if_absent, header_get, header_set};
pub use path::{ParsedPath, build_path, build_target_uri};
pub use registry::{RegistryError, StrategyRegistry};
pub use strategy::{ProviderStrategy, builtin_strategies};
