use super::provider::{Completion, CompletionRequest, LlmProvider, Message, Role};
use crate::catalog::ProviderKind;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn build_messages(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|m| {
            let role = match m.role {
                Role::System => "system",
                Role::User => "user",
            };
            json!({ "role": role, "content": m.content })
        })
        .collect()
}

fn build_body(request: &CompletionRequest) -> Value {
    let mut body = json!({
        "model": request.model,
        "messages": build_messages(&request.messages),
        "max_tokens": request.max_tokens,
    });
    if let Some(t) = request.temperature {
        body["temperature"] = json!(t);
    }
    body
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
        let body = build_body(request);

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("request to OpenAI failed")?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body_text = resp.text().await.unwrap_or_default();
            anyhow::bail!("status {status}: {body_text}");
        }
        let data: Value = resp
            .json()
            .await
            .context("malformed response: body is not JSON")?;

        let content = data["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("malformed response: no message content in first choice"))?;
        let model = data["model"].as_str().map(str::to_string);

        Ok(Completion { content, model })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_support::serve_once;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4o".into(),
            messages: vec![Message::system("be an analyst"), Message::user("analyze this")],
            max_tokens: 4000,
            temperature: Some(0.2),
        }
    }

    #[test]
    fn messages_map_to_system_and_user_roles_only() {
        let msgs = build_messages(&request().messages);
        let roles: Vec<_> = msgs.iter().map(|m| m["role"].as_str().unwrap()).collect();
        assert_eq!(roles, vec!["system", "user"]);
    }

    #[tokio::test]
    async fn sends_system_and_user_messages_with_sampling_controls() {
        let (addr, captured) = serve_once(
            200,
            r#"{"model":"gpt-4o-2024-05-13","choices":[{"message":{"role":"assistant","content":"Response 1: ok"}},{"message":{"content":"second"}}]}"#,
        )
        .await;

        let provider = OpenAiProvider::new(format!("http://{addr}/v1/"), "sk-openai");
        let out = provider.complete(&request()).await.unwrap();
        assert_eq!(out.content, "Response 1: ok");
        assert_eq!(out.model.as_deref(), Some("gpt-4o-2024-05-13"));

        let (headers, body) = captured.lock().unwrap().take().unwrap();
        assert_eq!(headers["authorization"], "Bearer sk-openai");
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 4000);
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
        let msgs = body["messages"].as_array().unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0]["role"], "system");
        assert_eq!(msgs[0]["content"], "be an analyst");
        assert_eq!(msgs[1]["role"], "user");
        assert_eq!(msgs[1]["content"], "analyze this");
    }

    #[tokio::test]
    async fn quota_error_is_reported_with_status() {
        let (addr, _) = serve_once(429, r#"{"error":{"code":"insufficient_quota"}}"#).await;

        let provider = OpenAiProvider::new(format!("http://{addr}/v1"), "sk-openai");
        let err = provider.complete(&request()).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains("insufficient_quota"));
    }

    #[tokio::test]
    async fn null_content_is_malformed() {
        let (addr, _) = serve_once(200, r#"{"choices":[{"message":{"content":null}}]}"#).await;

        let provider = OpenAiProvider::new(format!("http://{addr}/v1"), "sk-openai");
        let err = provider.complete(&request()).await.unwrap_err();
        assert!(err.to_string().contains("malformed response"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = OpenAiProvider::new(format!("http://{addr}/v1"), "sk-openai");
        assert!(provider.complete(&request()).await.is_err());
    }
}
