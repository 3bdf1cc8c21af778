use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{CommitFormat, ProviderConfig};
use crate::context::ContextCache;
use crate::git::GitRepo;
use crate::providers::{
    http_client, resolve_or, send_generation_request, staged_prompt, CommitMessageProvider,
};

const PROVIDER_NAME: &str = "anthropic";
const DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";
const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: String,
}

/// Anthropic messages backend. Stateless.
pub struct AnthropicProvider {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    repo_name: String,
    cache: ContextCache,
}

impl AnthropicProvider {
    pub fn new(config: &ProviderConfig, repo_name: &str, cache: ContextCache) -> Result<Self> {
        let endpoint = resolve_or(&config.endpoint, DEFAULT_ENDPOINT);
        Url::parse(&endpoint).context("Invalid Anthropic endpoint")?;

        Ok(Self {
            client: http_client()?,
            endpoint,
            api_key: config.api_key.clone(),
            model: resolve_or(&config.model, DEFAULT_MODEL),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            repo_name: repo_name.to_string(),
            cache,
        })
    }
}

#[async_trait(?Send)]
impl CommitMessageProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate_commit_message(
        &mut self,
        repo: &GitRepo,
        format: CommitFormat,
    ) -> Result<String> {
        let prompt = staged_prompt(repo, format)?;

        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let url = format!("{}/v1/messages", self.endpoint);
        let response: MessagesResponse = send_generation_request(
            self.client
                .post(&url)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", API_VERSION)
                .json(&request),
        )
        .await?;

        let Some(block) = response.content.into_iter().next() else {
            bail!("Error generating commit message: empty response");
        };

        Ok(block.text.trim().to_string())
    }

    fn clear_context(&self) {
        self.cache
            .clear_context(&self.repo_name, PROVIDER_NAME, &self.model);
    }
}
