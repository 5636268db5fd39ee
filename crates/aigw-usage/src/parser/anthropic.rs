use std::time::SystemTime;

use serde_json::Value;
use tracing::trace;

use crate::event::{TokenMetrics, UsageEvent};
use crate::pricing;

use super::{ParseContext, UNKNOWN_MODEL, strip_bom, u32_field};

/// Reads Anthropic messages responses and prices them.
///
/// Streaming responses emit on `message_start` (from `message.usage`) and on
/// `message_stop` (from a top-level `usage`); the model seen at
/// `message_start` is remembered for later events.
#[derive(Debug)]
pub struct AnthropicParser {
    ctx: ParseContext,
    model: Option<String>,
}

impl AnthropicParser {
    pub fn new(ctx: ParseContext) -> Self {
        Self { ctx, model: None }
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
        match value.get("type").and_then(Value::as_str)? {
            "message_start" => {
                let message = value.get("message")?;
                if let Some(model) = message.get("model").and_then(Value::as_str) {
                    self.model = Some(model.to_string());
                }
                self.emit(message.get("usage")?)
            }
            "message_stop" => self.emit(value.get("usage")?),
            _ => None,
        }
    }

    pub fn on_body(&mut self, body: &[u8]) -> Option<UsageEvent> {
        let value: Value = match serde_json::from_slice(strip_bom(body)) {
            Ok(value) => value,
            Err(err) => {
                trace!(error = %err, "response body is not JSON");
                return None;
            }
        };
        if let Some(model) = value.get("model").and_then(Value::as_str) {
            self.model = Some(model.to_string());
        }
        self.emit(value.get("usage")?)
    }

    fn emit(&self, usage: &Value) -> Option<UsageEvent> {
        let input = u32_field(usage, "input_tokens");
        let output = u32_field(usage, "output_tokens");
        if input.is_none() && output.is_none() {
            return None;
        }
        let input = input.unwrap_or(0);
        let output = output.unwrap_or(0);
        let cache_creation = u32_field(usage, "cache_creation_input_tokens").unwrap_or(0);
        let cache_read = u32_field(usage, "cache_read_input_tokens").unwrap_or(0);
        let model = self.model.as_deref().unwrap_or(UNKNOWN_MODEL);

        Some(UsageEvent {
            request_id: self.ctx.request_id.clone(),
            provider: self.ctx.provider.clone(),
            model: model.to_string(),
            streaming: self.ctx.streaming,
            at: SystemTime::now(),
            tokens: TokenMetrics::new(input, output, cache_read),
            cost: Some(pricing::cost_for(model, input, output, cache_creation, cache_read)),
        })
    }
}
