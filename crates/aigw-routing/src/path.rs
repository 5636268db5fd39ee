/// An inbound URL path split into non-empty segments.
///
/// Parsing never fails; empty segments are discarded so `/a//b/` and `/a/b`
/// parse identically. The query is stored without a leading `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    pub original: String,
    pub segments: Vec<String>,
    pub query: String,
}

impl ParsedPath {
    pub fn parse(path: &str, query: &str) -> Self {
        let segments = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            original: path.to_string(),
            segments,
            query: query.strip_prefix('?').unwrap_or(query).to_string(),
        }
    }

    /// First path segment, i.e. the provider name.
    pub fn provider(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// Everything after the provider segment.
    pub fn rest(&self) -> &[String] {
        self.segments.get(1..).unwrap_or(&[])
    }
}

/// Joins segments back into a path, appending the query when non-empty.
///
/// No URL-encoding is applied; upstream hosts receive segments verbatim.
pub fn build_path(segments: &[String], query: &str) -> String {
    let mut out = String::with_capacity(1 + segments.iter().map(|s| s.len() + 1).sum::<usize>());
    out.push('/');
    out.push_str(&segments.join("/"));
    let query = query.strip_prefix('?').unwrap_or(query);
    if !query.is_empty() {
        out.push('?');
        out.push_str(query);
    }
    out
}

pub fn build_target_uri(scheme: &str, host: &str, segments: &[String], query: &str) -> String {
    format!("{scheme}://{host}{}", build_path(segments, query))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_segments_are_elided() {
        let parsed = ParsedPath::parse("/a//b/", "");
        assert_eq!(parsed.segments, segs(&["a", "b"]));
        assert_eq!(parsed, ParsedPath::parse("/a/b", ""));
    }

    #[test]
    fn parse_is_idempotent() {
        for path in ["/openai/v1/chat/completions", "/a//b/", "/", ""] {
            let once = ParsedPath::parse(path, "stream=true");
            let twice = ParsedPath::parse(&once.original, &once.query);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn provider_and_rest() {
        let parsed = ParsedPath::parse("/anthropic/v1/messages", "");
        assert_eq!(parsed.provider(), Some("anthropic"));
        assert_eq!(parsed.rest(), segs(&["v1", "messages"]).as_slice());

        let empty = ParsedPath::parse("/", "");
        assert_eq!(empty.provider(), None);
        assert!(empty.rest().is_empty());
    }

    #[test]
    fn query_leading_question_mark_is_stripped() {
        let parsed = ParsedPath::parse("/openai/v1/models", "?limit=5");
        assert_eq!(parsed.query, "limit=5");
    }

    #[test]
    fn build_path_appends_query() {
        assert_eq!(build_path(&segs(&["v1", "models"]), ""), "/v1/models");
        assert_eq!(
            build_path(&segs(&["v1", "models"]), "?limit=5"),
            "/v1/models?limit=5"
        );
        assert_eq!(build_path(&[], ""), "/");
    }

    #[test]
    fn build_target_uri_concatenates() {
        assert_eq!(
            build_target_uri("https", "api.openai.com", &segs(&["v1", "embeddings"]), "a=b"),
            "https://api.openai.com/v1/embeddings?a=b"
        );
    }
}
