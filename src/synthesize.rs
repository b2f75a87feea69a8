//! A thin wrapper around a chat-completions endpoint that turns a
//! natural-language task into patch text framed by the engine's sentinels.
//!
//! This module never touches `DiffError`; the engine doesn't know this
//! collaborator exists. Its only contract with the core is that its output
//! is text the core's `text_to_patch` can parse.

use anyhow::Context;
use anyhow::Result;
use anyhow::anyhow;
use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4.1";

/// Produces patch text for a task against one file's current contents.
#[async_trait]
pub trait PatchSynthesizer {
    async fn synthesize(&self, task: &str, file_path: &str, file_contents: &str) -> Result<String>;
}

/// A `PatchSynthesizer` backed by an OpenAI-compatible `/chat/completions`
/// endpoint, configured entirely from the `CONTEXTPATCH_*` environment
/// variables so the CLI needs no flags for it.
pub struct ChatPatchSynthesizer {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl ChatPatchSynthesizer {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("CONTEXTPATCH_API_KEY")
            .context("CONTEXTPATCH_API_KEY must be set to call the patch synthesizer")?;
        let api_base = std::env::var("CONTEXTPATCH_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let model = std::env::var("CONTEXTPATCH_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            api_base,
            api_key,
            model,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

const SYSTEM_PROMPT: &str = "You edit source files by emitting a pseudo-diff patch. \
Respond with nothing but a single patch block starting with '*** Begin Patch' and ending \
with '*** End Patch'. Use context lines, not line numbers, to anchor every edit.";

#[async_trait]
impl PatchSynthesizer for ChatPatchSynthesizer {
    async fn synthesize(&self, task: &str, file_path: &str, file_contents: &str) -> Result<String> {
        let user_prompt = format!(
            "Task: {task}\n\nFile: {file_path}\n\nCurrent contents:\n{file_contents}"
        );
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: 0.0,
        };

        let url = format!("{}/chat/completions", self.api_base);
        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("patch synthesis request failed: {status} - {body}"));
        }
        let parsed: ChatResponse = resp.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("patch synthesis response contained no choices"))?;
        Ok(content)
    }
}
