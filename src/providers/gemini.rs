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

const PROVIDER_NAME: &str = "gemini";
const DEFAULT_MODEL: &str = "gemini-pro";
const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// Google Gemini backend. Stateless; authenticates through a URL query key
/// rather than a header.
pub struct GeminiProvider {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    repo_name: String,
    cache: ContextCache,
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig, repo_name: &str, cache: ContextCache) -> Result<Self> {
        let endpoint = resolve_or(&config.endpoint, DEFAULT_ENDPOINT);
        Url::parse(&endpoint).context("Invalid Gemini endpoint")?;

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
impl CommitMessageProvider for GeminiProvider {
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

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.max_tokens,
                temperature: self.temperature,
            },
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        );
        let response: GenerateContentResponse =
            send_generation_request(self.client.post(&url).json(&request)).await?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text);

        let Some(text) = text else {
            bail!("Error generating commit message: empty response");
        };

        Ok(text.trim().to_string())
    }

    fn clear_context(&self) {
        self.cache
            .clear_context(&self.repo_name, PROVIDER_NAME, &self.model);
    }
}
