pub mod anthropic;
pub mod azure_openai;
pub mod gemini;
pub mod huggingface;
pub mod ollama;
pub mod openai;
pub mod prompt;

pub use anthropic::AnthropicProvider;
pub use azure_openai::AzureOpenAiProvider;
pub use gemini::GeminiProvider;
pub use huggingface::HuggingFaceProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::{CommitFormat, ProviderConfig};
use crate::context::ContextCache;
use crate::git::GitRepo;

/// Generation requests block until the backend answers; there is no retry.
const REQUEST_TIMEOUT_SECS: u64 = 300;

/// One interchangeable text-generation backend. Variants differ only in
/// request payload, response extraction, auth headers, and whether they
/// persist conversational state.
#[async_trait(?Send)]
pub trait CommitMessageProvider {
    fn name(&self) -> &'static str;

    fn model(&self) -> &str;

    /// Produces a finished commit message for the staged changes, or an error
    /// when nothing is staged or the backend call fails.
    async fn generate_commit_message(
        &mut self,
        repo: &GitRepo,
        format: CommitFormat,
    ) -> Result<String>;

    /// Removes this provider's cached context for the current repository.
    fn clear_context(&self);
}

/// Maps a configured provider name to an instance. Adding a backend means
/// adding an arm here and a variant module, nothing else.
pub fn create_provider(
    name: &str,
    config: &ProviderConfig,
    repo_name: &str,
    cache: ContextCache,
) -> Result<Box<dyn CommitMessageProvider>> {
    match name {
        "openai" => Ok(Box::new(OpenAiProvider::new(config, repo_name, cache)?)),
        "anthropic" => Ok(Box::new(AnthropicProvider::new(config, repo_name, cache)?)),
        "gemini" => Ok(Box::new(GeminiProvider::new(config, repo_name, cache)?)),
        "azure_openai" => Ok(Box::new(AzureOpenAiProvider::new(config, repo_name, cache)?)),
        "ollama" => Ok(Box::new(OllamaProvider::new(config, repo_name, cache)?)),
        "huggingface" => Ok(Box::new(HuggingFaceProvider::new(config, repo_name, cache)?)),
        other => bail!("Unknown provider '{other}'"),
    }
}

pub(crate) fn http_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .context("Failed to create HTTP client")
}

/// Configured value, or the variant's hard-coded default when unset.
pub(crate) fn resolve_or(configured: &str, default: &str) -> String {
    if configured.trim().is_empty() {
        default.to_string()
    } else {
        configured.trim_end_matches('/').to_string()
    }
}

/// Reads the staged diff and wraps it in the format's prompt. Bails before
/// any network traffic when nothing is staged.
pub(crate) fn staged_prompt(repo: &GitRepo, format: CommitFormat) -> Result<String> {
    let diff = repo
        .staged_diff_text()?
        .context("No staged changes found.")?;
    Ok(prompt::build_prompt(&diff, format))
}

/// Sends a prepared generation request and decodes the JSON body, folding
/// transport failures and non-2xx statuses into one terminal error.
pub(crate) async fn send_generation_request<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T> {
    let response = request
        .send()
        .await
        .map_err(|e| anyhow!("Error generating commit message: {e}"))?;

    let status = response.status();
    if !status.is_success() {
        bail!("Error generating commit message: HTTP {status}");
    }

    response
        .json::<T>()
        .await
        .map_err(|e| anyhow!("Error generating commit message: {e}"))
}
