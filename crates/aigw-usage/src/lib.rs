//! Streaming usage observation.
//!
//! The observer tees response bytes to a per-request parser task that
//! extracts token usage (and, for Anthropic, cost) without perturbing the
//! bytes delivered to the client. Parsing is strictly best-effort: nothing in
//! this crate can fail a proxied request.

pub mod event;
pub mod observer;
pub mod parser;
pub mod pricing;
pub mod sse;
pub mod tracker;

pub use event::{CostBreakdown, TokenMetrics, UsageEvent};
pub use observer::observe;
pub use parser::{FamilyParser, ParserFamily};
pub use tracker::{
    AnthropicTracker, LogSink, OpenAiCompatTracker, TrackerSet, UsageSink, UsageTracker,
};
