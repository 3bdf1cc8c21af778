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

const PROVIDER_NAME: &str = "huggingface";
const DEFAULT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";
const DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co/models";

#[derive(Debug, Serialize)]
struct InferenceRequest {
    inputs: String,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f32,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// Hosted inference API backend. Stateless.
pub struct HuggingFaceProvider {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    repo_name: String,
    cache: ContextCache,
}

impl HuggingFaceProvider {
    pub fn new(config: &ProviderConfig, repo_name: &str, cache: ContextCache) -> Result<Self> {
        let endpoint = resolve_or(&config.endpoint, DEFAULT_ENDPOINT);
        Url::parse(&endpoint).context("Invalid Hugging Face endpoint")?;

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
impl CommitMessageProvider for HuggingFaceProvider {
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

        let request = InferenceRequest {
            inputs: prompt,
            parameters: InferenceParameters {
                max_new_tokens: self.max_tokens,
                temperature: self.temperature,
                return_full_text: false,
            },
        };

        let url = format!("{}/{}", self.endpoint, self.model);
        let response: Vec<GeneratedText> = send_generation_request(
            self.client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request),
        )
        .await?;

        let Some(generation) = response.into_iter().next() else {
            bail!("Error generating commit message: empty response");
        };

        Ok(generation.generated_text.trim().to_string())
    }

    fn clear_context(&self) {
        self.cache
            .clear_context(&self.repo_name, PROVIDER_NAME, &self.model);
    }
}
