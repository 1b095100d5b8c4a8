use crate::analysis::Analyzer;
use crate::catalog::ProviderKind;
use crate::providers::{anthropic, openai, AnthropicProvider, LlmProvider, OpenAiProvider};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderCredentials {
    #[serde(default)]
    pub api_key: String,
    /// Overrides the provider's public endpoint (proxies, gateways).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// API keys for each provider, stored in `~/.promptscope/credentials.json`.
/// Environment variables take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic: Option<ProviderCredentials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai: Option<ProviderCredentials>,
}

fn env_names(provider: ProviderKind) -> (&'static str, &'static str) {
    match provider {
        ProviderKind::Anthropic => ("ANTHROPIC_API_KEY", "ANTHROPIC_BASE_URL"),
        ProviderKind::OpenAi => ("OPENAI_API_KEY", "OPENAI_BASE_URL"),
    }
}

impl Credentials {
    pub fn path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".promptscope")
            .join("credentials.json")
    }

    /// File contents overlaid with the process environment.
    pub fn load() -> Result<Self> {
        let mut creds = Self::load_from(&Self::path())?;
        creds.apply_env(|name| std::env::var(name).ok());
        Ok(creds)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        let creds: Credentials = serde_json::from_str(&data)?;
        Ok(creds)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for provider in ProviderKind::ALL {
            let (key_var, url_var) = env_names(provider);
            let key = lookup(key_var).filter(|v| !v.trim().is_empty());
            let url = lookup(url_var).filter(|v| !v.trim().is_empty());
            if key.is_none() && url.is_none() {
                continue;
            }
            let entry = self.slot_mut(provider).get_or_insert_with(Default::default);
            if let Some(key) = key {
                debug!(provider = %provider, "api key taken from {key_var}");
                entry.api_key = key.trim().to_string();
            }
            if url.is_some() {
                entry.base_url = url;
            }
        }
    }

    pub fn get(&self, provider: ProviderKind) -> Option<&ProviderCredentials> {
        match provider {
            ProviderKind::Anthropic => self.anthropic.as_ref(),
            ProviderKind::OpenAi => self.openai.as_ref(),
        }
    }

    fn slot_mut(&mut self, provider: ProviderKind) -> &mut Option<ProviderCredentials> {
        match provider {
            ProviderKind::Anthropic => &mut self.anthropic,
            ProviderKind::OpenAi => &mut self.openai,
        }
    }

    pub fn set(&mut self, provider: ProviderKind, creds: ProviderCredentials) {
        *self.slot_mut(provider) = Some(creds);
    }

    pub fn is_configured(&self, provider: ProviderKind) -> bool {
        self.get(provider).is_some_and(|c| !c.api_key.is_empty())
    }

    pub fn build_provider(&self, provider: ProviderKind) -> Option<Arc<dyn LlmProvider>> {
        let creds = self.get(provider).filter(|c| !c.api_key.is_empty())?;
        let client: Arc<dyn LlmProvider> = match provider {
            ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(
                creds.base_url.as_deref().unwrap_or(anthropic::DEFAULT_BASE_URL),
                &creds.api_key,
            )),
            ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(
                creds.base_url.as_deref().unwrap_or(openai::DEFAULT_BASE_URL),
                &creds.api_key,
            )),
        };
        Some(client)
    }

    /// An analyzer with a client for every provider that has a key.
    pub fn build_analyzer(&self) -> Analyzer {
        ProviderKind::ALL
            .into_iter()
            .filter_map(|p| self.build_provider(p))
            .fold(Analyzer::builder(), |b, client| b.with_provider(client))
            .build()
    }
}
