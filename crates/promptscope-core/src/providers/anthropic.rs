use super::provider::{Completion, CompletionRequest, LlmProvider, Message, Role};
use crate::catalog::ProviderKind;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AnthropicProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn build_anthropic_messages(messages: &[Message]) -> (Option<String>, Vec<Value>) {
    let mut system_parts = Vec::new();
    let mut msgs = Vec::new();

    for m in messages {
        match m.role {
            Role::System => system_parts.push(m.content.as_str()),
            Role::User => msgs.push(json!({ "role": "user", "content": m.content })),
        }
    }

    let system = if system_parts.is_empty() {
        None
    } else {
        Some(system_parts.join("\n"))
    };

    (system, msgs)
}

fn build_body(request: &CompletionRequest) -> Value {
    let (system, msgs) = build_anthropic_messages(&request.messages);

    let mut body = json!({
        "model": request.model,
        "max_tokens": request.max_tokens,
        "messages": msgs,
    });
    if let Some(sys) = system {
        body["system"] = json!(sys);
    }
    if let Some(t) = request.temperature {
        body["temperature"] = json!(t);
    }
    body
}

fn extract_text(data: &Value) -> Option<String> {
    data["content"]
        .as_array()?
        .iter()
        .find(|block| block["type"].as_str() == Some("text"))
        .and_then(|block| block["text"].as_str())
        .map(str::to_string)
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
        let body = build_body(request);

        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .context("request to Anthropic failed")?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body_text = resp.text().await.unwrap_or_default();
            anyhow::bail!("status {status}: {body_text}");
        }
        let data: Value = resp
            .json()
            .await
            .context("malformed response: body is not JSON")?;

        let content = extract_text(&data)
            .ok_or_else(|| anyhow::anyhow!("malformed response: no text content block"))?;
        let model = data["model"].as_str().map(str::to_string);

        Ok(Completion { content, model })
    }
}
