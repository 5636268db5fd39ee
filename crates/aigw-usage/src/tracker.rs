//! Per-provider tracking decisions and event sinks.

use std::sync::Arc;

use aigw_routing::ParsedPath;
use async_trait::async_trait;
use tracing::info;

use crate::event::UsageEvent;
use crate::parser::ParserFamily;

/// Terminal consumer of usage events. Implementations must tolerate
/// concurrent calls; delivery is best-effort.
#[async_trait]
pub trait UsageSink: Send + Sync {
    async fn consume(&self, event: &UsageEvent);
}

/// Default sink: one structured log record per event.
pub struct LogSink;

#[async_trait]
impl UsageSink for LogSink {
    async fn consume(&self, event: &UsageEvent) {
        info!(
            event = "usage_recorded",
            request_id = %event.request_id,
            provider = %event.provider,
            model = %event.model,
            streaming = event.streaming,
            input_tokens = event.tokens.input,
            output_tokens = event.tokens.output,
            cached_tokens = event.tokens.cached,
            total_tokens = event.tokens.total,
            total_cost = ?event.cost.map(|cost| cost.total_cost),
        );
    }
}

/// Decides whether a routed request should be observed, and owns the sink
/// its events flow into.
#[async_trait]
pub trait UsageTracker: Send + Sync {
    fn provider(&self) -> &'static str;

    fn family(&self) -> ParserFamily;

    fn should_track(&self, path: &ParsedPath) -> bool;

    async fn consume(&self, event: UsageEvent);
}

/// Providers that speak the OpenAI wire format.
const OPENAI_COMPATIBLE: &[&str] = &[
    "openai",
    "groq",
    "mistral",
    "deepseek",
    "perplexity",
    "together",
    "xai",
    "openrouter",
    "fireworks",
    "cerebras",
    "sambanova",
    "moonshot",
    "siliconflow",
];

const OPENAI_TRACKED_PATHS: &[&str] = &["v1/chat/completions", "v1/completions", "v1/embeddings"];

pub struct OpenAiCompatTracker {
    sink: Arc<dyn UsageSink>,
}

impl OpenAiCompatTracker {
    pub fn new(sink: Arc<dyn UsageSink>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl UsageTracker for OpenAiCompatTracker {
    fn provider(&self) -> &'static str {
        "openai"
    }

    fn family(&self) -> ParserFamily {
        ParserFamily::OpenAiCompatible
    }

    fn should_track(&self, path: &ParsedPath) -> bool {
        let Some(provider) = path.provider() else {
            return false;
        };
        if !OPENAI_COMPATIBLE.contains(&provider.to_ascii_lowercase().as_str()) {
            return false;
        }
        OPENAI_TRACKED_PATHS.contains(&path.rest().join("/").as_str())
    }

    async fn consume(&self, event: UsageEvent) {
        self.sink.consume(&event).await;
    }
}

pub struct AnthropicTracker {
    sink: Arc<dyn UsageSink>,
}

impl AnthropicTracker {
    pub fn new(sink: Arc<dyn UsageSink>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl UsageTracker for AnthropicTracker {
    fn provider(&self) -> &'static str {
        "anthropic"
    }

    fn family(&self) -> ParserFamily {
        ParserFamily::Anthropic
    }

    fn should_track(&self, path: &ParsedPath) -> bool {
        path.provider()
            .is_some_and(|provider| provider.eq_ignore_ascii_case("anthropic"))
            && path.rest().join("/").contains("v1/messages")
    }

    async fn consume(&self, event: UsageEvent) {
        self.sink.consume(&event).await;
    }
}

/// All trackers the gateway consults, in registration order.
pub struct TrackerSet {
    trackers: Vec<Arc<dyn UsageTracker>>,
}

impl TrackerSet {
    pub fn new(trackers: Vec<Arc<dyn UsageTracker>>) -> Self {
        Self { trackers }
    }

    pub fn with_default_sink() -> Self {
        let sink: Arc<dyn UsageSink> = Arc::new(LogSink);
        Self::new(vec![
            Arc::new(OpenAiCompatTracker::new(sink.clone())),
            Arc::new(AnthropicTracker::new(sink)),
        ])
    }

    /// First tracker claiming the request, if any.
    pub fn match_for(&self, path: &ParsedPath) -> Option<Arc<dyn UsageTracker>> {
        self.trackers
            .iter()
            .find(|tracker| tracker.should_track(path))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> TrackerSet {
        TrackerSet::with_default_sink()
    }

    #[test]
    fn openai_chat_completions_is_tracked() {
        let tracker = set()
            .match_for(&ParsedPath::parse("/openai/v1/chat/completions", ""))
            .unwrap();
        assert_eq!(tracker.family(), ParserFamily::OpenAiCompatible);
    }

    #[test]
    fn compatible_providers_are_tracked_on_exact_paths() {
        let set = set();
        assert!(set.match_for(&ParsedPath::parse("/groq/v1/embeddings", "")).is_some());
        assert!(set.match_for(&ParsedPath::parse("/deepseek/v1/completions", "")).is_some());
        assert!(set.match_for(&ParsedPath::parse("/openai/v1/models", "")).is_none());
        assert!(set.match_for(&ParsedPath::parse("/openai/v1/chat/completions/extra", "")).is_none());
    }

    #[test]
    fn anthropic_messages_is_tracked() {
        let set = set();
        let tracker = set
            .match_for(&ParsedPath::parse("/anthropic/v1/messages", ""))
            .unwrap();
        assert_eq!(tracker.family(), ParserFamily::Anthropic);
        assert!(
            set.match_for(&ParsedPath::parse("/anthropic/v1/messages/count_tokens", ""))
                .is_some()
        );
        assert!(set.match_for(&ParsedPath::parse("/anthropic/v1/models", "")).is_none());
    }

    #[test]
    fn untracked_providers_are_ignored() {
        assert!(set().match_for(&ParsedPath::parse("/elevenlabs/v1/text-to-speech", "")).is_none());
    }
}
