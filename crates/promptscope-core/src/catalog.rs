use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The remote model services an analysis can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Anthropic,
    #[serde(rename = "openai")]
    OpenAi,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Anthropic, ProviderKind::OpenAi];

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::OpenAi => "OpenAI",
        }
    }

    /// Key used in credential files and CLI flags.
    pub fn slug(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAi => "openai",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider '{0}' (expected one of: anthropic, openai)")]
pub struct UnknownProvider(pub String);

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" => Ok(ProviderKind::Anthropic),
            "openai" | "open-ai" => Ok(ProviderKind::OpenAi),
            _ => Err(UnknownProvider(s.to_string())),
        }
    }
}

/// A selectable model: the id sent on the wire and the name shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub id: &'static str,
    pub display_name: &'static str,
}

const ANTHROPIC_MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: "claude-3-opus-20240229",
        display_name: "Claude 3 Opus",
    },
    ModelInfo {
        id: "claude-3-sonnet-20240229",
        display_name: "Claude 3 Sonnet",
    },
    ModelInfo {
        id: "claude-3-haiku-20240307",
        display_name: "Claude 3 Haiku",
    },
];

const OPENAI_MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: "gpt-4-0125-preview",
        display_name: "GPT-4 Turbo",
    },
    ModelInfo {
        id: "gpt-4",
        display_name: "GPT-4",
    },
    ModelInfo {
        id: "gpt-3.5-turbo",
        display_name: "GPT-3.5 Turbo",
    },
    ModelInfo {
        id: "gpt-4o",
        display_name: "GPT-4o",
    },
    ModelInfo {
        id: "gpt-4o-mini",
        display_name: "GPT-4o-Mini",
    },
];

/// Read-only table of the models each provider offers.
///
/// The table is fixed at compile time; callers should only offer
/// combinations listed here.
pub struct ProviderCatalog;

impl ProviderCatalog {
    pub fn providers() -> &'static [ProviderKind] {
        &ProviderKind::ALL
    }

    pub fn models(provider: ProviderKind) -> &'static [ModelInfo] {
        match provider {
            ProviderKind::Anthropic => ANTHROPIC_MODELS,
            ProviderKind::OpenAi => OPENAI_MODELS,
        }
    }

    pub fn find(provider: ProviderKind, model_id: &str) -> Option<&'static ModelInfo> {
        Self::models(provider).iter().find(|m| m.id == model_id)
    }

    pub fn display_name(provider: ProviderKind, model_id: &str) -> Option<&'static str> {
        Self::find(provider, model_id).map(|m| m.display_name)
    }

    pub fn contains(provider: ProviderKind, model_id: &str) -> bool {
        Self::find(provider, model_id).is_some()
    }

    /// First listed model, used when the caller does not pick one.
    pub fn default_model(provider: ProviderKind) -> &'static ModelInfo {
        &Self::models(provider)[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_provider_names_case_insensitively() {
        assert_eq!("Anthropic".parse::<ProviderKind>().unwrap(), ProviderKind::Anthropic);
        assert_eq!("OPENAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!("open-ai".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert!("gemini".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn display_uses_vendor_capitalization() {
        assert_eq!(ProviderKind::Anthropic.to_string(), "Anthropic");
        assert_eq!(ProviderKind::OpenAi.to_string(), "OpenAI");
    }

    #[test]
    fn anthropic_models_are_listed_in_order() {
        let ids: Vec<_> = ProviderCatalog::models(ProviderKind::Anthropic)
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(
            ids,
            vec![
                "claude-3-opus-20240229",
                "claude-3-sonnet-20240229",
                "claude-3-haiku-20240307"
            ]
        );
    }

    #[test]
    fn openai_catalog_has_five_models() {
        assert_eq!(ProviderCatalog::models(ProviderKind::OpenAi).len(), 5);
        assert_eq!(
            ProviderCatalog::display_name(ProviderKind::OpenAi, "gpt-4o-mini"),
            Some("GPT-4o-Mini")
        );
    }

    #[test]
    fn models_do_not_cross_providers() {
        assert!(ProviderCatalog::contains(ProviderKind::Anthropic, "claude-3-haiku-20240307"));
        assert!(!ProviderCatalog::contains(ProviderKind::OpenAi, "claude-3-haiku-20240307"));
        assert!(!ProviderCatalog::contains(ProviderKind::Anthropic, "gpt-4"));
    }

    #[test]
    fn default_model_is_first_entry() {
        assert_eq!(
            ProviderCatalog::default_model(ProviderKind::Anthropic).id,
            "claude-3-opus-20240229"
        );
        assert_eq!(
            ProviderCatalog::default_model(ProviderKind::OpenAi).id,
            "gpt-4-0125-preview"
        );
    }

    #[test]
    fn provider_kind_serializes_as_slug() {
        assert_eq!(serde_json::to_string(&ProviderKind::OpenAi).unwrap(), "\"openai\"");
        assert_eq!(
            serde_json::from_str::<ProviderKind>("\"anthropic\"").unwrap(),
            ProviderKind::Anthropic
        );
    }
}
