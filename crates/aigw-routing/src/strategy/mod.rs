//! Per-provider rewrite rules.
//!
//! A strategy is a pure function from the parsed path to a [`RouteTarget`].
//! Strategies never read or modify request bodies and never inject
//! authorization material; client credentials flow through untouched.

mod aws_bedrock;
mod azure_openai;
mod prefixed;
mod transparent;
mod vertex_ai;

use std::sync::Arc;

use crate::decision::{RouteError, RouteTarget};
use crate::path::ParsedPath;

pub use aws_bedrock::AwsBedrock;
pub use azure_openai::AzureOpenAi;
pub use prefixed::Prefixed;
pub use transparent::Transparent;
pub use vertex_ai::VertexAi;

pub trait ProviderStrategy: Send + Sync {
    /// Lowercase provider name, unique across the registry.
    fn name(&self) -> &'static str;

    fn route(&self, path: &ParsedPath) -> Result<RouteTarget, RouteError>;
}

/// Every strategy the gateway ships with.
///
/// Strategies are registered explicitly so the provider set is auditable;
/// the registry rejects duplicate names at startup.
pub fn builtin_strategies() -> Vec<Arc<dyn ProviderStrategy>> {
    vec![
        Arc::new(Transparent::new("openai", "api.openai.com")),
        Arc::new(Transparent::new("anthropic", "api.anthropic.com")),
        Arc::new(Transparent::new("groq", "api.groq.com")),
        Arc::new(Transparent::new("mistral", "api.mistral.ai")),
        Arc::new(Transparent::new("deepseek", "api.deepseek.com")),
        Arc::new(Transparent::new("perplexity", "api.perplexity.ai")),
        Arc::new(Transparent::new("cohere", "api.cohere.com")),
        Arc::new(Transparent::new("together", "api.together.xyz")),
        Arc::new(Transparent::new("elevenlabs", "api.elevenlabs.io")),
        Arc::new(Transparent::new("replicate", "api.replicate.com")),
        Arc::new(Transparent::new("xai", "api.x.ai")),
        Arc::new(Transparent::new("cerebras", "api.cerebras.ai")),
        Arc::new(Transparent::new("sambanova", "api.sambanova.ai")),
        Arc::new(Transparent::new("moonshot", "api.moonshot.cn")),
        Arc::new(Transparent::new("zhipu", "open.bigmodel.cn")),
        Arc::new(Transparent::new("minimax", "api.minimax.chat")),
        Arc::new(Transparent::new("alibaba", "dashscope.aliyuncs.com")),
        Arc::new(Transparent::new("siliconflow", "api.siliconflow.cn")),
        Arc::new(Transparent::new("lepton", "api.lepton.ai")),
        Arc::new(Transparent::new("anyscale", "api.endpoints.anyscale.com")),
        Arc::new(Transparent::new(
            "google-ai-studio",
            "generativelanguage.googleapis.com",
        )),
        Arc::new(Prefixed::new("openrouter", "openrouter.ai", "api")),
        Arc::new(Prefixed::new("fireworks", "api.fireworks.ai", "inference")),
        Arc::new(AwsBedrock),
        Arc::new(AzureOpenAi),
        Arc::new(VertexAi),
    ]
}
