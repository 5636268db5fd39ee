use crate::decision::{RouteError, RouteTarget};
use crate::path::ParsedPath;
use crate::validate::{min_segments, not_empty};

use super::ProviderStrategy;

/// `/google-vertex-ai/projects/{project}/locations/{location}/...` →
/// `{location}-aiplatform.googleapis.com/v1/projects/{project}/locations/{location}/...`.
#[derive(Debug, Clone, Copy)]
pub struct VertexAi;

impl ProviderStrategy for VertexAi {
    fn name(&self) -> &'static str {
        "google-vertex-ai"
    }

    fn route(&self, path: &ParsedPath) -> Result<RouteTarget, RouteError> {
        let rest = path.rest();
        min_segments(rest, 4)
            .map_err(|err| RouteError::new(format!("google-vertex-ai: {err}")))?;
        if rest[0] != "projects" || rest[2] != "locations" {
            return Err(RouteError::new(
                "google-vertex-ai expects projects/{project}/locations/{location} path segments",
            ));
        }
        let project = &rest[1];
        let location = &rest[3];
        not_empty(project, "project").map_err(RouteError::new)?;
        not_empty(location, "location").map_err(RouteError::new)?;

        let mut segments = Vec::with_capacity(5 + rest.len() - 4);
        segments.push("v1".to_string());
        segments.push("projects".to_string());
        segments.push(project.clone());
        segments.push("locations".to_string());
        segments.push(location.clone());
        segments.extend(rest[4..].iter().cloned());

        Ok(
            RouteTarget::builder(self.name(), format!("{location}-aiplatform.googleapis.com"))
                .segments(segments)
                .query(&path.query)
                .metadata("Project", project)
                .metadata("Location", location)
                .build(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_to_regional_host() {
        let path = ParsedPath::parse(
            "/google-vertex-ai/projects/my-proj/locations/us-central1/publishers/google/models/gemini:generateContent",
            "",
        );
        let target = VertexAi.route(&path).unwrap();
        assert_eq!(target.host, "us-central1-aiplatform.googleapis.com");
        assert_eq!(
            target.target_uri(),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/my-proj/locations/us-central1/publishers/google/models/gemini:generateContent"
        );
    }

    #[test]
    fn rejects_short_paths() {
        let path = ParsedPath::parse("/google-vertex-ai/projects/my-proj", "");
        assert!(VertexAi.route(&path).is_err());
    }

    #[test]
    fn rejects_wrong_literals() {
        let path = ParsedPath::parse("/google-vertex-ai/a/b/c/d", "");
        let err = VertexAi.route(&path).unwrap_err();
        assert!(err.to_string().contains("projects"));
    }
}
