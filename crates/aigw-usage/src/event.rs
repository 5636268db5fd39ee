use std::time::SystemTime;

use rust_decimal::Decimal;
use serde::Serialize;

/// Token counts extracted from one upstream response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenMetrics {
    pub input: u32,
    pub output: u32,
    pub cached: u32,
    pub total: u32,
}

impl TokenMetrics {
    pub fn new(input: u32, output: u32, cached: u32) -> Self {
        Self {
            input,
            output,
            cached,
            total: input + output,
        }
    }
}

/// Per-bucket monetary cost, six-decimal fixed point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CostBreakdown {
    pub input_cost: Decimal,
    pub output_cost: Decimal,
    pub cache_creation_cost: Decimal,
    pub cache_read_cost: Decimal,
    pub total_cost: Decimal,
}

/// One observed response worth of usage telemetry.
#[derive(Debug, Clone, Serialize)]
pub struct UsageEvent {
    pub request_id: String,
    pub provider: String,
    pub model: String,
    pub streaming: bool,
    pub at: SystemTime,
    pub tokens: TokenMetrics,
    pub cost: Option<CostBreakdown>,
}
