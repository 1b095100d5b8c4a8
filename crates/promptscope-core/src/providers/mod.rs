pub mod anthropic;
pub mod openai;
pub mod provider;
#[cfg(test)]
mod test_support;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;
pub use provider::{Completion, CompletionRequest, LlmProvider, Message, Role};
