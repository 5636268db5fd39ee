use crate::decision::{RouteError, RouteTarget};
use crate::path::ParsedPath;

use super::ProviderStrategy;

/// Forwards the remaining path verbatim to a fixed host.
#[derive(Debug, Clone, Copy)]
pub struct Transparent {
    name: &'static str,
    host: &'static str,
}

impl Transparent {
    pub const fn new(name: &'static str, host: &'static str) -> Self {
        Self { name, host }
    }
}

impl ProviderStrategy for Transparent {
    fn name(&self) -> &'static str {
        self.name
    }

    fn route(&self, path: &ParsedPath) -> Result<RouteTarget, RouteError> {
        Ok(RouteTarget::builder(self.name, self.host)
            .segments(path.rest().to_vec())
            .query(&path.query)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_rest_and_query() {
        let strategy = Transparent::new("openai", "api.openai.com");
        let path = ParsedPath::parse("/openai/a/b/c", "x=1");
        let target = strategy.route(&path).unwrap();
        assert_eq!(target.host, "api.openai.com");
        assert_eq!(target.target_segments, vec!["a", "b", "c"]);
        assert_eq!(target.target_uri(), "https://api.openai.com/a/b/c?x=1");
    }

    #[test]
    fn empty_rest_maps_to_root() {
        let strategy = Transparent::new("anthropic", "api.anthropic.com");
        let target = strategy.route(&ParsedPath::parse("/anthropic", "")).unwrap();
        assert_eq!(target.target_uri(), "https://api.anthropic.com/");
    }
}
