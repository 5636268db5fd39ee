use std::time::SystemTime;

use serde_json::Value;
use tracing::trace;

use crate::event::{TokenMetrics, UsageEvent};

use super::{ParseContext, UNKNOWN_MODEL, strip_bom, u32_field};

/// Reads OpenAI-style `usage` objects from chat/completions/embeddings
/// responses. No cost is computed for this family.
#[derive(Debug)]
pub struct OpenAiParser {
    ctx: ParseContext,
}

impl OpenAiParser {
    pub fn new(ctx: ParseContext) -> Self {
        Self { ctx }
    }

    pub fn on_data(&mut self, payload: &str) -> Option<UsageEvent> {
        let payload = payload.trim();
        if payload.is_empty() || payload == "[DONE]" {
            return None;
        }
        let value: Value = match serde_json::from_str(payload) {
            Ok(value) => value,
            Err(err) => {
                trace!(error = %err, "skipping malformed stream frame");
                return None;
            }
        };
        self.extract(&value)
    }

    pub fn on_body(&mut self, body: &[u8]) -> Option<UsageEvent> {
        let value: Value = match serde_json::from_slice(strip_bom(body)) {
            Ok(value) => value,
            Err(err) => {
                trace!(error = %err, "response body is not JSON");
                return None;
            }
        };
        self.extract(&value)
    }

    fn extract(&self, value: &Value) -> Option<UsageEvent> {
        // Streaming chunks carry `"usage": null` until the final one.
        let usage = value.get("usage").filter(|usage| usage.is_object())?;
        let prompt = u32_field(usage, "prompt_tokens");
        let completion = u32_field(usage, "completion_tokens");
        if prompt.is_none() && completion.is_none() {
            return None;
        }
        let cached = usage
            .get("prompt_tokens_details")
            .and_then(|details| u32_field(details, "cached_tokens"))
            .unwrap_or(0);
        let model = value
            .get("model")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_MODEL);

        Some(UsageEvent {
            request_id: self.ctx.request_id.clone(),
            provider: self.ctx.provider.clone(),
            model: model.to_string(),
            streaming: self.ctx.streaming,
            at: SystemTime::now(),
            tokens: TokenMetrics::new(prompt.unwrap_or(0), completion.unwrap_or(0), cached),
            cost: None,
        })
    }
}
