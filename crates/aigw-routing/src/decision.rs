use std::collections::BTreeMap;

use crate::headers::Headers;
use crate::path::build_target_uri;

/// A strategy or registry rejection, surfaced to the client as 404 text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct RouteError(String);

impl RouteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The resolved upstream origin for one request.
#[derive(Debug, Clone)]
pub struct RouteTarget {
    pub provider: String,
    pub scheme: String,
    pub host: String,
    pub target_segments: Vec<String>,
    pub query: String,
    pub extra_headers: Headers,
    pub metadata: BTreeMap<String, String>,
}

impl RouteTarget {
    pub fn builder(provider: impl Into<String>, host: impl Into<String>) -> RouteTargetBuilder {
        RouteTargetBuilder::new(provider, host)
    }

    pub fn target_uri(&self) -> String {
        build_target_uri(&self.scheme, &self.host, &self.target_segments, &self.query)
    }
}

#[derive(Debug)]
pub struct RouteTargetBuilder {
    target: RouteTarget,
}

impl RouteTargetBuilder {
    pub fn new(provider: impl Into<String>, host: impl Into<String>) -> Self {
        let provider = provider.into();
        let mut metadata = BTreeMap::new();
        metadata.insert("Provider".to_string(), provider.clone());
        Self {
            target: RouteTarget {
                provider,
                scheme: "https".to_string(),
                host: host.into(),
                target_segments: Vec::new(),
                query: String::new(),
                extra_headers: Headers::new(),
                metadata,
            },
        }
    }

    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.target.scheme = scheme.into();
        self
    }

    pub fn segments(mut self, segments: Vec<String>) -> Self {
        self.target.target_segments = segments;
        self
    }

    pub fn query(mut self, query: &str) -> Self {
        self.target.query = query.to_string();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.target.extra_headers.push((name.into(), value.into()));
        self
    }

    /// Caller-supplied metadata; last write wins on key collision.
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.target.metadata.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> RouteTarget {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_to_https_and_stamps_provider() {
        let target = RouteTarget::builder("openai", "api.openai.com")
            .segments(vec!["v1".to_string(), "models".to_string()])
            .build();
        assert_eq!(target.scheme, "https");
        assert_eq!(target.metadata.get("Provider").map(String::as_str), Some("openai"));
        assert!(target.extra_headers.is_empty());
        assert_eq!(target.target_uri(), "https://api.openai.com/v1/models");
    }

    #[test]
    fn caller_metadata_wins_on_collision() {
        let target = RouteTarget::builder("openai", "api.openai.com")
            .metadata("Provider", "renamed")
            .metadata("Region", "us-east-1")
            .build();
        assert_eq!(target.metadata.get("Provider").map(String::as_str), Some("renamed"));
        assert_eq!(target.metadata.get("Region").map(String::as_str), Some("us-east-1"));
    }

    #[test]
    fn target_uri_includes_query() {
        let target = RouteTarget::builder("azure-openai", "res.openai.azure.com")
            .segments(vec!["openai".to_string()])
            .query("api-version=2024-02-01")
            .build();
        assert_eq!(
            target.target_uri(),
            "https://res.openai.azure.com/openai?api-version=2024-02-01"
        );
    }
}
