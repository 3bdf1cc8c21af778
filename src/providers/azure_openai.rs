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

const PROVIDER_NAME: &str = "azure_openai";
const DEFAULT_MODEL: &str = "gpt-35-turbo";
const API_VERSION: &str = "2024-02-01";

#[derive(Debug, Serialize)]
struct ChatRequest {
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Azure-hosted OpenAI deployments. Same chat shape as OpenAI but addressed
/// per deployment and authenticated with an `api-key` header. There is no
/// default endpoint; the resource URL must be configured.
pub struct AzureOpenAiProvider {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    repo_name: String,
    cache: ContextCache,
}

impl AzureOpenAiProvider {
    pub fn new(config: &ProviderConfig, repo_name: &str, cache: ContextCache) -> Result<Self> {
        let endpoint = resolve_or(&config.endpoint, "");
        if endpoint.is_empty() {
            bail!("Azure OpenAI requires a configured endpoint. Run 'scrive config update --provider azure_openai --endpoint <url>'.");
        }
        Url::parse(&endpoint).context("Invalid Azure OpenAI endpoint")?;

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
impl CommitMessageProvider for AzureOpenAiProvider {
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

        let request = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.model, API_VERSION
        );
        let response: ChatResponse = send_generation_request(
            self.client
                .post(&url)
                .header("api-key", &self.api_key)
                .json(&request),
        )
        .await?;

        let Some(choice) = response.choices.into_iter().next() else {
            bail!("Error generating commit message: empty response");
        };

        Ok(choice.message.content.trim().to_string())
    }

    fn clear_context(&self) {
        self.cache
            .clear_context(&self.repo_name, PROVIDER_NAME, &self.model);
    }
}
