use crate::config::settings::ProviderConfig;

/// Every backend the tool knows how to talk to.
pub const PROVIDER_NAMES: [&str; 6] = [
    "openai",
    "anthropic",
    "gemini",
    "azure_openai",
    "ollama",
    "huggingface",
];

pub fn is_known_provider(name: &str) -> bool {
    PROVIDER_NAMES.contains(&name)
}

/// Default settings for a recognized provider, or None for an unknown name.
pub fn provider_defaults(name: &str) -> Option<ProviderConfig> {
    let (model, endpoint) = match name {
        "openai" => ("gpt-3.5-turbo", "https://api.openai.com/v1"),
        "anthropic" => ("claude-3-sonnet-20240229", "https://api.anthropic.com"),
        "gemini" => ("gemini-pro", "https://generativelanguage.googleapis.com/v1"),
        // Azure OpenAI has no usable default endpoint; the user supplies one.
        "azure_openai" => ("gpt-35-turbo", ""),
        "ollama" => ("llama2", "http://localhost:11434"),
        "huggingface" => (
            "mistralai/Mistral-7B-Instruct-v0.2",
            "https://api-inference.huggingface.co/models",
        ),
        _ => return None,
    };

    Some(ProviderConfig {
        model: model.to_string(),
        endpoint: endpoint.to_string(),
        api_key: String::new(),
        max_tokens: 50,
        temperature: 0.7,
    })
}
