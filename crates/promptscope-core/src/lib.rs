pub mod analysis;
pub mod catalog;
pub mod config;
pub mod prompts;
pub mod providers;

pub use analysis::{
    AnalysisError, AnalysisRequest, AnalysisResult, Analyzer, AnalyzerBuilder, InfluenceReport,
    ResponseEntry,
};
pub use catalog::{ModelInfo, ProviderCatalog, ProviderKind, UnknownProvider};
pub use config::{Credentials, PromptscopeConfig, ProviderCredentials};
pub use prompts::{render_analysis_prompt, ANALYST_SYSTEM_INSTRUCTION};
pub use providers::{
    AnthropicProvider, Completion, CompletionRequest, LlmProvider, Message, OpenAiProvider, Role,
};
