use crate::decision::{RouteError, RouteTarget};
use crate::path::ParsedPath;
use crate::validate::not_empty;

use super::ProviderStrategy;

/// `/azure-openai/{resource}/{deployment}/...` →
/// `{resource}.openai.azure.com/openai/deployments/{deployment}/...`.
#[derive(Debug, Clone, Copy)]
pub struct AzureOpenAi;

impl ProviderStrategy for AzureOpenAi {
    fn name(&self) -> &'static str {
        "azure-openai"
    }

    fn route(&self, path: &ParsedPath) -> Result<RouteTarget, RouteError> {
        let rest = path.rest();
        if rest.len() < 2 {
            return Err(RouteError::new(
                "azure-openai requires at least resource and deployment path segments",
            ));
        }
        let resource = &rest[0];
        let deployment = &rest[1];
        not_empty(resource, "resource").map_err(RouteError::new)?;
        not_empty(deployment, "deployment").map_err(RouteError::new)?;

        let mut segments = Vec::with_capacity(3 + rest.len() - 2);
        segments.push("openai".to_string());
        segments.push("deployments".to_string());
        segments.push(deployment.clone());
        segments.extend(rest[2..].iter().cloned());

        Ok(RouteTarget::builder(self.name(), format!("{resource}.openai.azure.com"))
            .segments(segments)
            .query(&path.query)
            .metadata("ResourceName", resource)
            .metadata("DeploymentName", deployment)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_to_deployment_path() {
        let path = ParsedPath::parse(
            "/azure-openai/myres/mydep/chat/completions",
            "api-version=2024-02-01",
        );
        let target = AzureOpenAi.route(&path).unwrap();
        assert_eq!(
            target.target_uri(),
            "https://myres.openai.azure.com/openai/deployments/mydep/chat/completions?api-version=2024-02-01"
        );
        assert_eq!(target.metadata.get("ResourceName").map(String::as_str), Some("myres"));
        assert_eq!(target.metadata.get("DeploymentName").map(String::as_str), Some("mydep"));
    }

    #[test]
    fn rejects_missing_deployment() {
        let path = ParsedPath::parse("/azure-openai/myres", "");
        let err = AzureOpenAi.route(&path).unwrap_err();
        assert!(err.to_string().contains("resource and deployment"));
    }
}
