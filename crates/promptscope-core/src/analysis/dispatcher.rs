use super::error::AnalysisError;
use crate::catalog::{ProviderCatalog, ProviderKind};
use crate::prompts::{render_analysis_prompt, ANALYST_SYSTEM_INSTRUCTION};
use crate::providers::{CompletionRequest, LlmProvider, Message};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};

pub const MAX_OUTPUT_TOKENS: u32 = 4000;
pub const OPENAI_TEMPERATURE: f32 = 0.2;

/// A validated analysis job. Construct with [`AnalysisRequest::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    system_prompt: String,
    conversation_log: String,
    provider: ProviderKind,
    model: String,
}

impl AnalysisRequest {
    pub fn new(
        system_prompt: impl Into<String>,
        conversation_log: impl Into<String>,
        provider: ProviderKind,
        model: impl Into<String>,
    ) -> Result<Self, AnalysisError> {
        let system_prompt = system_prompt.into();
        let conversation_log = conversation_log.into();
        let model = model.into();

        if system_prompt.trim().is_empty() {
            return Err(AnalysisError::EmptyInput {
                field: "system prompt",
            });
        }
        if conversation_log.trim().is_empty() {
            return Err(AnalysisError::EmptyInput {
                field: "conversation log",
            });
        }
        if !ProviderCatalog::contains(provider, &model) {
            return Err(AnalysisError::UnsupportedModel { provider, model });
        }

        Ok(Self {
            system_prompt,
            conversation_log,
            provider,
            model,
        })
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn conversation_log(&self) -> &str {
        &self.conversation_log
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The provider-specific call shape for this request.
    pub fn completion_request(&self) -> CompletionRequest {
        let prompt = render_analysis_prompt(&self.system_prompt, &self.conversation_log);
        match self.provider {
            ProviderKind::Anthropic => CompletionRequest {
                model: self.model.clone(),
                messages: vec![Message::user(prompt)],
                max_tokens: MAX_OUTPUT_TOKENS,
                temperature: None,
            },
            ProviderKind::OpenAi => CompletionRequest {
                model: self.model.clone(),
                messages: vec![
                    Message::system(ANALYST_SYSTEM_INSTRUCTION),
                    Message::user(prompt),
                ],
                max_tokens: MAX_OUTPUT_TOKENS,
                temperature: Some(OPENAI_TEMPERATURE),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    /// Model output, verbatim.
    pub raw_analysis: String,
    pub model_used: String,
}

/// Routes analysis requests to injected provider clients.
pub struct Analyzer {
    anthropic: Option<Arc<dyn LlmProvider>>,
    openai: Option<Arc<dyn LlmProvider>>,
}

pub struct AnalyzerBuilder {
    anthropic: Option<Arc<dyn LlmProvider>>,
    openai: Option<Arc<dyn LlmProvider>>,
}

impl AnalyzerBuilder {
    /// Register a client in the slot named by its own `kind()`.
    /// A later client for the same provider replaces the earlier one.
    pub fn with_provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        match provider.kind() {
            ProviderKind::Anthropic => self.anthropic = Some(provider),
            ProviderKind::OpenAi => self.openai = Some(provider),
        }
        self
    }

    pub fn build(self) -> Analyzer {
        Analyzer {
            anthropic: self.anthropic,
            openai: self.openai,
        }
    }
}

impl Analyzer {
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder {
            anthropic: None,
            openai: None,
        }
    }

    pub fn is_configured(&self, provider: ProviderKind) -> bool {
        self.client(provider).is_some()
    }

    fn client(&self, provider: ProviderKind) -> Option<&Arc<dyn LlmProvider>> {
        match provider {
            ProviderKind::Anthropic => self.anthropic.as_ref(),
            ProviderKind::OpenAi => self.openai.as_ref(),
        }
    }

    pub async fn analyze_influence(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        let provider = request.provider();
        let client = self
            .client(provider)
            .ok_or(AnalysisError::ProviderNotConfigured { provider })?;

        let completion_request = request.completion_request();
        debug!(
            provider = %provider,
            model = %request.model(),
            messages = completion_request.messages.len(),
            "dispatching influence analysis"
        );

        let completion = client
            .complete(&completion_request)
            .await
            .map_err(|source| AnalysisError::Remote { provider, source })?;

        info!(
            provider = %provider,
            model = %request.model(),
            chars = completion.content.len(),
            "influence analysis complete"
        );

        Ok(AnalysisResult {
            raw_analysis: completion.content,
            model_used: request.model().to_string(),
        })
    }

    /// Like [`Analyzer::analyze_influence`] but logs the failure and yields `None`.
    pub async fn try_analyze_influence(&self, request: &AnalysisRequest) -> Option<AnalysisResult> {
        match self.analyze_influence(request).await {
            Ok(result) => Some(result),
            Err(e) => {
                error!("{e}");
                None
            }
        }
    }
}
