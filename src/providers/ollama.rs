use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

use crate::config::{CommitFormat, ProviderConfig};
use crate::context::ContextCache;
use crate::git::GitRepo;
use crate::providers::{
    http_client, resolve_or, send_generation_request, staged_prompt, CommitMessageProvider,
};

const PROVIDER_NAME: &str = "ollama";
const DEFAULT_MODEL: &str = "llama2";
const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<Value>,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    context: Option<Value>,
}

/// Local HTTP-served models. The only stateful variant: Ollama hands back a
/// token-context array that is cached and replayed on the next invocation.
pub struct OllamaProvider {
    client: Client,
    endpoint: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    repo_name: String,
    cache: ContextCache,
    context: Option<Value>,
}

impl OllamaProvider {
    pub fn new(config: &ProviderConfig, repo_name: &str, cache: ContextCache) -> Result<Self> {
        let model = resolve_or(&config.model, DEFAULT_MODEL);
        let endpoint = resolve_or(&config.endpoint, DEFAULT_ENDPOINT);
        Url::parse(&endpoint).context("Invalid Ollama endpoint")?;

        let context = cache.get_context(repo_name, PROVIDER_NAME, &model);
        if context.is_some() {
            debug!("Loaded cached context for {repo_name}/{PROVIDER_NAME}/{model}");
        }

        Ok(Self {
            client: http_client()?,
            endpoint,
            model,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            repo_name: repo_name.to_string(),
            cache,
            context,
        })
    }
}

#[async_trait(?Send)]
impl CommitMessageProvider for OllamaProvider {
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

        let request = GenerateRequest {
            model: self.model.clone(),
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
            context: self
                .context
                .as_ref()
                .and_then(|cached| cached.get("context"))
                .cloned(),
        };

        let url = format!("{}/api/generate", self.endpoint);
        let response: GenerateResponse =
            send_generation_request(self.client.post(&url).json(&request)).await?;

        let message = response.response.trim().to_string();

        if let Some(tokens) = response.context {
            let data = json!({ "context": tokens });
            self.cache
                .save_context(&self.repo_name, PROVIDER_NAME, &self.model, data.clone());
            self.context = Some(data);
        }

        Ok(message)
    }

    fn clear_context(&self) {
        self.cache
            .clear_context(&self.repo_name, PROVIDER_NAME, &self.model);
    }
}
