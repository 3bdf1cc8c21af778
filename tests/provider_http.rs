use httpmock::prelude::*;
use serde_json::json;
use std::fs;
use std::path::Path;

use scrive::config::defaults::PROVIDER_NAMES;
use scrive::config::ProviderConfig;
use scrive::context::ContextCache;
use scrive::git::GitRepo;
use scrive::providers::create_provider;
use scrive::CommitFormat;

/// Creates a scratch repository named `name` with the given files staged.
fn staged_repo(name: &str, files: &[(&str, &str)]) -> (tempfile::TempDir, GitRepo) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join(name);
    fs::create_dir(&root).unwrap();

    let raw = git2::Repository::init(&root).unwrap();
    let mut config = raw.config().unwrap();
    config.set_str("user.name", "tester").unwrap();
    config.set_str("user.email", "tester@example.com").unwrap();

    for (file, content) in files {
        fs::write(root.join(file), content).unwrap();
        let mut index = raw.index().unwrap();
        index.add_path(Path::new(file)).unwrap();
        index.write().unwrap();
    }

    let repo = GitRepo::open(&root).unwrap();
    (dir, repo)
}

fn provider_config(endpoint: &str, model: &str) -> ProviderConfig {
    ProviderConfig {
        model: model.to_string(),
        endpoint: endpoint.to_string(),
        api_key: "test-key".to_string(),
        max_tokens: 50,
        temperature: 0.7,
    }
}

fn scratch_cache() -> (tempfile::TempDir, ContextCache) {
    let dir = tempfile::tempdir().unwrap();
    let cache = ContextCache::new(Some(dir.path().to_path_buf())).unwrap();
    (dir, cache)
}

#[tokio::test]
async fn ollama_trims_message_and_caches_returned_context() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/generate")
                .body_contains("File: a.txt\\nhello");
            then.status(200).json_body(json!({
                "response": " feat: add hello ",
                "context": [1, 2, 3]
            }));
        })
        .await;

    let (_repo_dir, repo) = staged_repo("demo", &[("a.txt", "hello")]);
    let (_cache_dir, cache) = scratch_cache();
    let config = provider_config(&server.base_url(), "llama2");

    let mut provider = create_provider("ollama", &config, "demo", cache.clone()).unwrap();
    let message = provider
        .generate_commit_message(&repo, CommitFormat::Conventional)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(message, "feat: add hello");
    assert_eq!(
        cache.get_context("demo", "ollama", "llama2"),
        Some(json!({ "context": [1, 2, 3] }))
    );
}

#[tokio::test]
async fn ollama_replays_cached_context_on_the_next_call() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/generate")
                .body_contains("\"context\":[1,2,3]");
            then.status(200)
                .json_body(json!({ "response": "fix: follow up" }));
        })
        .await;

    let (_repo_dir, repo) = staged_repo("demo", &[("a.txt", "hello")]);
    let (_cache_dir, cache) = scratch_cache();
    cache.save_context("demo", "ollama", "llama2", json!({ "context": [1, 2, 3] }));

    // Context is loaded eagerly at construction time.
    let config = provider_config(&server.base_url(), "llama2");
    let mut provider = create_provider("ollama", &config, "demo", cache).unwrap();
    let message = provider
        .generate_commit_message(&repo, CommitFormat::Conventional)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(message, "fix: follow up");
}

#[tokio::test]
async fn openai_extracts_first_chat_choice() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("authorization", "Bearer test-key");
            then.status(200).json_body(json!({
                "choices": [
                    { "message": { "content": " fix: correct greeting " } }
                ]
            }));
        })
        .await;

    let (_repo_dir, repo) = staged_repo("demo", &[("a.txt", "hello")]);
    let (_cache_dir, cache) = scratch_cache();
    let config = provider_config(&server.base_url(), "gpt-3.5-turbo");

    let mut provider = create_provider("openai", &config, "demo", cache).unwrap();
    let message = provider
        .generate_commit_message(&repo, CommitFormat::Simple)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(message, "fix: correct greeting");
}

#[tokio::test]
async fn anthropic_sends_versioned_auth_headers() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/messages")
                .header("x-api-key", "test-key")
                .header("anthropic-version", "2023-06-01");
            then.status(200).json_body(json!({
                "content": [ { "text": "docs: expand readme" } ]
            }));
        })
        .await;

    let (_repo_dir, repo) = staged_repo("demo", &[("README.md", "# demo")]);
    let (_cache_dir, cache) = scratch_cache();
    let config = provider_config(&server.base_url(), "claude-3-sonnet-20240229");

    let mut provider = create_provider("anthropic", &config, "demo", cache).unwrap();
    let message = provider
        .generate_commit_message(&repo, CommitFormat::Conventional)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(message, "docs: expand readme");
}

#[tokio::test]
async fn huggingface_extracts_generated_text() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/distilgpt2")
                .header("authorization", "Bearer test-key");
            then.status(200)
                .json_body(json!([ { "generated_text": " chore: tidy " } ]));
        })
        .await;

    let (_repo_dir, repo) = staged_repo("demo", &[("a.txt", "hello")]);
    let (_cache_dir, cache) = scratch_cache();
    let config = provider_config(&server.base_url(), "distilgpt2");

    let mut provider = create_provider("huggingface", &config, "demo", cache).unwrap();
    let message = provider
        .generate_commit_message(&repo, CommitFormat::Simple)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(message, "chore: tidy");
}

#[tokio::test]
async fn azure_openai_addresses_the_deployment() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/openai/deployments/gpt-35-turbo/chat/completions")
                .query_param("api-version", "2024-02-01")
                .header("api-key", "test-key");
            then.status(200).json_body(json!({
                "choices": [ { "message": { "content": "feat: azure path" } } ]
            }));
        })
        .await;

    let (_repo_dir, repo) = staged_repo("demo", &[("a.txt", "hello")]);
    let (_cache_dir, cache) = scratch_cache();
    let config = provider_config(&server.base_url(), "gpt-35-turbo");

    let mut provider = create_provider("azure_openai", &config, "demo", cache).unwrap();
    let message = provider
        .generate_commit_message(&repo, CommitFormat::Conventional)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(message, "feat: azure path");
}

#[tokio::test]
async fn gemini_authenticates_through_the_query_key() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/models/gemini-pro:generateContent")
                .query_param("key", "test-key");
            then.status(200).json_body(json!({
                "candidates": [
                    { "content": { "parts": [ { "text": "test: cover gemini" } ] } }
                ]
            }));
        })
        .await;

    let (_repo_dir, repo) = staged_repo("demo", &[("a.txt", "hello")]);
    let (_cache_dir, cache) = scratch_cache();
    let config = provider_config(&server.base_url(), "gemini-pro");

    let mut provider = create_provider("gemini", &config, "demo", cache).unwrap();
    let message = provider
        .generate_commit_message(&repo, CommitFormat::Conventional)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(message, "test: cover gemini");
}

#[tokio::test]
async fn every_variant_short_circuits_when_nothing_is_staged() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({}));
        })
        .await;

    let (_repo_dir, repo) = staged_repo("empty", &[]);

    for name in PROVIDER_NAMES {
        let (_cache_dir, cache) = scratch_cache();
        let config = provider_config(&server.base_url(), "");

        let mut provider = create_provider(name, &config, "empty", cache).unwrap();
        let err = provider
            .generate_commit_message(&repo, CommitFormat::Conventional)
            .await
            .unwrap_err();

        assert!(
            err.to_string().contains("No staged changes found."),
            "{name}: {err}"
        );
    }

    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn non_success_status_is_a_terminal_transport_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(500).body("backend exploded");
        })
        .await;

    let (_repo_dir, repo) = staged_repo("demo", &[("a.txt", "hello")]);
    let (_cache_dir, cache) = scratch_cache();
    let config = provider_config(&server.base_url(), "llama2");

    let mut provider = create_provider("ollama", &config, "demo", cache).unwrap();
    let err = provider
        .generate_commit_message(&repo, CommitFormat::Conventional)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Error generating commit message"));
}

#[tokio::test]
async fn clear_context_removes_the_providers_entry() {
    let server = MockServer::start_async().await;
    let (_cache_dir, cache) = scratch_cache();
    cache.save_context("demo", "ollama", "llama2", json!({ "context": [7] }));

    let config = provider_config(&server.base_url(), "llama2");
    let provider = create_provider("ollama", &config, "demo", cache.clone()).unwrap();

    provider.clear_context();
    assert_eq!(cache.get_context("demo", "ollama", "llama2"), None);

    // Idempotent on a now-empty cache.
    provider.clear_context();
}
