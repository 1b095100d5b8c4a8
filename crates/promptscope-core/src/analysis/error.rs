use crate::catalog::ProviderKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{field} is empty; both the system prompt and the conversation log are required")]
    EmptyInput { field: &'static str },

    #[error("model '{model}' is not offered by {provider}")]
    UnsupportedModel {
        provider: ProviderKind,
        model: String,
    },

    #[error("{provider} is not configured (no API key)")]
    ProviderNotConfigured { provider: ProviderKind },

    /// Network, auth, quota and malformed-response failures of the remote call.
    #[error("Error with {provider} API: {source:#}")]
    Remote {
        provider: ProviderKind,
        #[source]
        source: anyhow::Error,
    },
}

impl AnalysisError {
    pub fn provider(&self) -> Option<ProviderKind> {
        match self {
            AnalysisError::EmptyInput { .. } => None,
            AnalysisError::UnsupportedModel { provider, .. }
            | AnalysisError::ProviderNotConfigured { provider }
            | AnalysisError::Remote { provider, .. } => Some(*provider),
        }
    }
}
