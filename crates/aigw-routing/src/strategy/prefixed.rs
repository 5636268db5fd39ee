use crate::decision::{RouteError, RouteTarget};
use crate::path::ParsedPath;

use super::ProviderStrategy;

/// Forwards to a fixed host with one constant segment prepended.
///
/// OpenRouter serves its API under `/api`, Fireworks under `/inference`;
/// clients address the gateway with the bare provider path.
#[derive(Debug, Clone, Copy)]
pub struct Prefixed {
    name: &'static str,
    host: &'static str,
    prefix: &'static str,
}

impl Prefixed {
    pub const fn new(name: &'static str, host: &'static str, prefix: &'static str) -> Self {
        Self { name, host, prefix }
    }
}

impl ProviderStrategy for Prefixed {
    fn name(&self) -> &'static str {
        self.name
    }

    fn route(&self, path: &ParsedPath) -> Result<RouteTarget, RouteError> {
        let mut segments = Vec::with_capacity(1 + path.rest().len());
        segments.push(self.prefix.to_string());
        segments.extend(path.rest().iter().cloned());
        Ok(RouteTarget::builder(self.name, self.host)
            .segments(segments)
            .query(&path.query)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openrouter_prepends_api() {
        let strategy = Prefixed::new("openrouter", "openrouter.ai", "api");
        let path = ParsedPath::parse("/openrouter/v1/chat/completions", "");
        let target = strategy.route(&path).unwrap();
        assert_eq!(
            target.target_uri(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn fireworks_prepends_inference() {
        let strategy = Prefixed::new("fireworks", "api.fireworks.ai", "inference");
        let path = ParsedPath::parse("/fireworks/v1/completions", "");
        let target = strategy.route(&path).unwrap();
        assert_eq!(
            target.target_uri(),
            "https://api.fireworks.ai/inference/v1/completions"
        );
    }
}
