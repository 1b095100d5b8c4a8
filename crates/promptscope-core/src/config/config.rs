use crate::catalog::{ProviderCatalog, ProviderKind};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User preferences, read from `~/.promptscope/config.json` and overridden
/// key-by-key by a `.promptscope.json` in the working directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptscopeConfig {
    #[serde(default)]
    pub default_provider: Option<ProviderKind>,
    #[serde(default)]
    pub default_model: Option<String>,
}

impl PromptscopeConfig {
    pub fn load() -> Result<Self> {
        let config_path = Self::resolve_path("config.json");
        let local_path = std::env::current_dir()
            .ok()
            .map(|d| d.join(".promptscope.json"));
        Self::load_from(&config_path, local_path.as_deref())
    }

    pub fn load_from(config_path: &Path, local_path: Option<&Path>) -> Result<Self> {
        let mut config = if config_path.exists() {
            let data = std::fs::read_to_string(config_path)?;
            serde_json::from_str::<PromptscopeConfig>(&data)?
        } else {
            PromptscopeConfig::default()
        };

        if let Some(local) = local_path.filter(|p| p.exists()) {
            let data = std::fs::read_to_string(local)?;
            let override_val: serde_json::Value = serde_json::from_str(&data)?;
            let mut base = serde_json::to_value(&config)?;
            if let (Some(base_obj), Some(over_obj)) =
                (base.as_object_mut(), override_val.as_object())
            {
                for (k, v) in over_obj {
                    base_obj.insert(k.clone(), v.clone());
                }
            }
            config = serde_json::from_value(base)?;
        }

        Ok(config)
    }

    pub fn resolve_path(relative: &str) -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".promptscope")
            .join(relative)
    }

    /// Pick the provider and model for a run. Explicit choices win; a
    /// configured default model is only used when it belongs to the provider.
    pub fn select(
        &self,
        provider: Option<ProviderKind>,
        model: Option<&str>,
    ) -> (ProviderKind, String) {
        let provider = provider
            .or(self.default_provider)
            .unwrap_or(ProviderKind::Anthropic);

        let model = model
            .map(str::to_string)
            .or_else(|| {
                self.default_model
                    .clone()
                    .filter(|m| ProviderCatalog::contains(provider, m))
            })
            .unwrap_or_else(|| ProviderCatalog::default_model(provider).id.to_string());

        (provider, model)
    }
}
