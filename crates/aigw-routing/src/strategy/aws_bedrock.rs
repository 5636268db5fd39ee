use crate::decision::{RouteError, RouteTarget};
use crate::path::ParsedPath;
use crate::validate::not_empty;

use super::ProviderStrategy;

/// `/aws-bedrock/{runtime}/{region}/...` → `{runtime}.{region}.amazonaws.com`.
#[derive(Debug, Clone, Copy)]
pub struct AwsBedrock;

impl ProviderStrategy for AwsBedrock {
    fn name(&self) -> &'static str {
        "aws-bedrock"
    }

    fn route(&self, path: &ParsedPath) -> Result<RouteTarget, RouteError> {
        let rest = path.rest();
        if rest.len() < 2 {
            return Err(RouteError::new(
                "aws-bedrock requires at least runtime and region path segments",
            ));
        }
        let runtime = &rest[0];
        let region = &rest[1];
        not_empty(runtime, "runtime").map_err(RouteError::new)?;
        not_empty(region, "region").map_err(RouteError::new)?;

        Ok(RouteTarget::builder(self.name(), format!("{runtime}.{region}.amazonaws.com"))
            .segments(rest[2..].to_vec())
            .query(&path.query)
            .metadata("Runtime", runtime)
            .metadata("Region", region)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_regional_runtime_host() {
        let path = ParsedPath::parse(
            "/aws-bedrock/bedrock-runtime/us-east-1/model/claude-3-sonnet/invoke",
            "",
        );
        let target = AwsBedrock.route(&path).unwrap();
        assert_eq!(target.host, "bedrock-runtime.us-east-1.amazonaws.com");
        assert_eq!(target.target_segments, vec!["model", "claude-3-sonnet", "invoke"]);
        assert_eq!(
            target.target_uri(),
            "https://bedrock-runtime.us-east-1.amazonaws.com/model/claude-3-sonnet/invoke"
        );
        assert_eq!(target.metadata.get("Runtime").map(String::as_str), Some("bedrock-runtime"));
        assert_eq!(target.metadata.get("Region").map(String::as_str), Some("us-east-1"));
    }

    #[test]
    fn rejects_missing_region() {
        let path = ParsedPath::parse("/aws-bedrock/bedrock-runtime", "");
        let err = AwsBedrock.route(&path).unwrap_err();
        assert!(err.to_string().contains("requires at least runtime and region"));
    }
}
