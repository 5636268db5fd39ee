//! Per-family response parsers.
//!
//! Family selection is a closed sum type rather than trait dispatch; the set
//! of response formats the gateway understands is small and fixed.

mod anthropic;
mod openai;

use crate::event::UsageEvent;

pub use anthropic::AnthropicParser;
pub use openai::OpenAiParser;

/// Response formats the observer knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserFamily {
    OpenAiCompatible,
    Anthropic,
}

/// Per-request parsing context carried into every emitted event.
#[derive(Debug, Clone)]
pub struct ParseContext {
    pub request_id: String,
    pub provider: String,
    pub streaming: bool,
}

#[derive(Debug)]
pub enum FamilyParser {
    OpenAi(OpenAiParser),
    Anthropic(AnthropicParser),
}

impl FamilyParser {
    pub fn new(family: ParserFamily, ctx: ParseContext) -> Self {
        match family {
            ParserFamily::OpenAiCompatible => Self::OpenAi(OpenAiParser::new(ctx)),
            ParserFamily::Anthropic => Self::Anthropic(AnthropicParser::new(ctx)),
        }
    }

    /// Feeds one SSE `data:` payload from a streaming response.
    pub fn on_data(&mut self, payload: &str) -> Option<UsageEvent> {
        match self {
            Self::OpenAi(parser) => parser.on_data(payload),
            Self::Anthropic(parser) => parser.on_data(payload),
        }
    }

    /// Feeds the complete body of a non-streaming response.
    pub fn on_body(&mut self, body: &[u8]) -> Option<UsageEvent> {
        match self {
            Self::OpenAi(parser) => parser.on_body(body),
            Self::Anthropic(parser) => parser.on_body(body),
        }
    }
}

const UNKNOWN_MODEL: &str = "unknown";

/// The decoder strips a UTF-8 BOM when present; some upstreams emit one.
fn strip_bom(body: &[u8]) -> &[u8] {
    body.strip_prefix(b"\xef\xbb\xbf").unwrap_or(body)
}

fn u32_field(value: &serde_json::Value, key: &str) -> Option<u32> {
    value.get(key)?.as_u64().map(|v| v.min(u64::from(u32::MAX)) as u32)
}
