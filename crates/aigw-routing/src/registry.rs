use std::collections::HashMap;
use std::sync::Arc;

use crate::decision::{RouteError, RouteTarget};
use crate::path::ParsedPath;
use crate::strategy::{ProviderStrategy, builtin_strategies};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate provider strategy name: {0}")]
    DuplicateName(String),
}

/// Case-insensitive provider name → strategy mapping.
///
/// Built once at startup and never mutated afterwards.
pub struct StrategyRegistry {
    strategies: HashMap<String, Arc<dyn ProviderStrategy>>,
}

impl StrategyRegistry {
    pub fn new(
        strategies: impl IntoIterator<Item = Arc<dyn ProviderStrategy>>,
    ) -> Result<Self, RegistryError> {
        let mut map: HashMap<String, Arc<dyn ProviderStrategy>> = HashMap::new();
        for strategy in strategies {
            let key = strategy.name().to_ascii_lowercase();
            if map.insert(key.clone(), strategy).is_some() {
                return Err(RegistryError::DuplicateName(key));
            }
        }
        Ok(Self { strategies: map })
    }

    pub fn builtin() -> Result<Self, RegistryError> {
        Self::new(builtin_strategies())
    }

    /// Registered provider names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.strategies.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn route(&self, path: &ParsedPath) -> Result<RouteTarget, RouteError> {
        let Some(provider) = path.provider() else {
            return Err(RouteError::new("missing provider path segment"));
        };
        let Some(strategy) = self.strategies.get(&provider.to_ascii_lowercase()) else {
            return Err(RouteError::new(format!(
                "Unknown provider: {provider}. Available: {}",
                self.names().join(", ")
            )));
        };
        strategy.route(path)
    }
}
