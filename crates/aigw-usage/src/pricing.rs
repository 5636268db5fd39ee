//! Static Anthropic rate table.

use std::collections::HashMap;
use std::sync::LazyLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::event::CostBreakdown;

/// Per-million-token rates for one model.
#[derive(Debug, Clone, Copy)]
pub struct PricingEntry {
    pub input_per_million: Decimal,
    pub output_per_million: Decimal,
    pub cache_write_per_million: Decimal,
    pub cache_read_per_million: Decimal,
}

/// Models without a table entry are priced as this one.
pub const FALLBACK_MODEL: &str = "claude-3-5-sonnet-20241022";

static PRICING: LazyLock<HashMap<&'static str, PricingEntry>> = LazyLock::new(|| {
    let entry = |input, output, cache_write, cache_read| PricingEntry {
        input_per_million: input,
        output_per_million: output,
        cache_write_per_million: cache_write,
        cache_read_per_million: cache_read,
    };
    HashMap::from([
        (
            "claude-3-5-sonnet-20241022",
            entry(dec!(3.00), dec!(15.00), dec!(3.75), dec!(0.30)),
        ),
        (
            "claude-3-5-sonnet-20240620",
            entry(dec!(3.00), dec!(15.00), dec!(3.75), dec!(0.30)),
        ),
        (
            "claude-3-5-haiku-20241022",
            entry(dec!(1.00), dec!(5.00), dec!(1.25), dec!(0.10)),
        ),
        (
            "claude-3-opus-20240229",
            entry(dec!(15.00), dec!(75.00), dec!(18.75), dec!(1.50)),
        ),
        (
            "claude-3-sonnet-20240229",
            entry(dec!(3.00), dec!(15.00), dec!(3.75), dec!(0.30)),
        ),
        (
            "claude-3-haiku-20240307",
            entry(dec!(0.25), dec!(1.25), dec!(0.3125), dec!(0.025)),
        ),
    ])
});

pub fn entry_for(model: &str) -> PricingEntry {
    let key = model.to_ascii_lowercase();
    PRICING
        .get(key.as_str())
        .copied()
        .unwrap_or_else(|| PRICING[FALLBACK_MODEL])
}

/// `tokens × rate / 1,000,000`, rounded to six decimals per bucket.
pub fn cost_for(
    model: &str,
    input: u32,
    output: u32,
    cache_creation: u32,
    cache_read: u32,
) -> CostBreakdown {
    let rates = entry_for(model);
    let bucket =
        |tokens: u32, rate: Decimal| (Decimal::from(tokens) * rate / dec!(1000000)).round_dp(6);

    let input_cost = bucket(input, rates.input_per_million);
    let output_cost = bucket(output, rates.output_per_million);
    let cache_creation_cost = bucket(cache_creation, rates.cache_write_per_million);
    let cache_read_cost = bucket(cache_read, rates.cache_read_per_million);
    CostBreakdown {
        input_cost,
        output_cost,
        cache_creation_cost,
        cache_read_cost,
        total_cost: input_cost + output_cost + cache_creation_cost + cache_read_cost,
    }
}
