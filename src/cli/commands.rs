use anyhow::{bail, Result};
use log::{debug, info};

use crate::cli::args::{CacheCommands, ClearArgs, Commands, ConfigCommands, GenArgs, UpdateArgs};
use crate::cli::output::{OutputFormatter, Spinner};
use crate::config::Settings;
use crate::context::ContextCache;
use crate::git::GitRepo;
use crate::providers::create_provider;

/// Routes parsed commands end-to-end: config resolution, provider
/// construction, cache maintenance, and result rendering.
pub struct CommandHandler {
    settings: Settings,
    formatter: OutputFormatter,
}

impl CommandHandler {
    pub fn new() -> Result<Self> {
        let settings = Settings::load()?;
        let formatter = OutputFormatter::new(true);

        Ok(Self {
            settings,
            formatter,
        })
    }

    pub async fn handle_command(&mut self, command: Commands) -> Result<String> {
        match command {
            Commands::Gen(args) => self.handle_gen(args).await,
            Commands::Config { command } => match command {
                ConfigCommands::Create => self.handle_config_create(),
                ConfigCommands::Update(args) => self.handle_config_update(args),
                ConfigCommands::Show => self.handle_config_show(),
            },
            Commands::Cache { command } => match command {
                CacheCommands::Clear(args) => self.handle_cache_clear(args),
            },
        }
    }

    async fn handle_gen(&mut self, args: GenArgs) -> Result<String> {
        // The repository is resolved here, not ambiently at startup, so
        // config and cache commands keep working outside a work tree.
        let repo = GitRepo::discover()?;

        let provider_name = args
            .provider
            .unwrap_or_else(|| self.settings.core.provider.clone());
        debug!("Using provider '{provider_name}'");

        // Materialize and persist the provider section if it is missing.
        let newly_created = !self.settings.has_provider(&provider_name);
        let provider_config = self.settings.ensure_provider(&provider_name)?.clone();
        if newly_created {
            self.settings.save()?;
        }

        let cache = ContextCache::new(None)?;
        let mut provider = create_provider(&provider_name, &provider_config, &repo.name(), cache)?;

        let mut output = Vec::new();

        if args.clear_context {
            provider.clear_context();
            output.push("Context cache cleared.".to_string());
        }

        let format = args.format.unwrap_or(self.settings.core.commit_format);

        let spinner = Spinner::new("Generating commit message...");
        let result = provider.generate_commit_message(&repo, format).await;
        spinner.stop();

        let message = result?;
        info!("Generated commit message with {provider_name}");

        output.push(format!("\nGenerated commit message:\n{message}"));

        if args.auto {
            output.push(self.formatter.format_info("\nAuto-commit functionality coming soon!"));
        }

        Ok(output.join("\n"))
    }

    fn handle_config_create(&self) -> Result<String> {
        let config_path = Settings::config_path()?;
        if config_path.exists() {
            return Ok(format!(
                "Config already exists at {}. Use 'update' to modify.",
                config_path.display()
            ));
        }

        Settings::default().save_to(&config_path)?;
        Ok(self
            .formatter
            .format_success("Configuration file created with default settings."))
    }

    fn handle_config_update(&mut self, args: UpdateArgs) -> Result<String> {
        let core_change = args.format.is_some()
            || args.auto_commit.is_some()
            || args.cache_responses.is_some();
        if args.provider.is_none() && !core_change {
            bail!(
                "No settings to update. Please provide at least one setting. \
                 See 'scrive config update --help' for the available flags."
            );
        }

        if let Some(format) = args.format {
            self.settings.core.commit_format = format;
        }
        if let Some(auto_commit) = args.auto_commit {
            self.settings.core.auto_commit = auto_commit;
        }
        if let Some(cache_responses) = args.cache_responses {
            self.settings.core.cache_responses = cache_responses;
        }

        let mut output = Vec::new();

        if let Some(provider) = &args.provider {
            if args.set_default {
                self.settings.core.provider = provider.clone();
                output.push(format!("Default provider set to: {provider}"));
            }

            self.settings.ensure_provider(provider)?;
            if let Some(section) = self.settings.providers.get_mut(provider) {
                if let Some(api_key) = args.api_key {
                    section.api_key = api_key;
                }
                if let Some(endpoint) = args.endpoint {
                    section.endpoint = endpoint;
                }
                if let Some(model) = args.model {
                    section.model = model;
                }
                if let Some(max_tokens) = args.max_tokens {
                    section.max_tokens = max_tokens;
                }
                if let Some(temperature) = args.temperature {
                    section.temperature = temperature;
                }
            }
        }

        self.settings.save()?;
        output.push(self
            .formatter
            .format_success("Configuration updated successfully."));

        Ok(output.join("\n"))
    }

    fn handle_config_show(&self) -> Result<String> {
        let core = &self.settings.core;
        let mut output = String::from("Current Configuration:\n\nCore Settings:\n");
        output.push_str(&format!("  provider: {}\n", core.provider));
        output.push_str(&format!("  commit_format: {}\n", core.commit_format));
        output.push_str(&format!("  auto_commit: {}\n", core.auto_commit));
        output.push_str(&format!("  cache_responses: {}\n", core.cache_responses));

        output.push_str("\nProvider Settings:\n");
        for (name, section) in &self.settings.providers {
            let api_key = if section.api_key.is_empty() {
                "(not set)"
            } else {
                "<redacted>"
            };

            output.push_str(&format!("\n{name}:\n"));
            output.push_str(&format!("  model: {}\n", section.model));
            output.push_str(&format!("  endpoint: {}\n", section.endpoint));
            output.push_str(&format!("  api_key: {api_key}\n"));
            output.push_str(&format!("  max_tokens: {}\n", section.max_tokens));
            output.push_str(&format!("  temperature: {}\n", section.temperature));
        }

        output.push_str(&format!("\nDefault Provider: {}", core.provider));
        Ok(output)
    }

    fn handle_cache_clear(&self, args: ClearArgs) -> Result<String> {
        let cache = ContextCache::new(None)?;

        if args.all {
            cache.clear_all();
            return Ok(self.formatter.format_success("All caches cleared."));
        }

        let Some(provider) = args.provider else {
            return Ok(self
                .formatter
                .format_info("Please specify --provider or --all to clear caches."));
        };

        if let Some(model) = args.model {
            let repo = GitRepo::discover()?;
            cache.clear_context(&repo.name(), &provider, &model);
            Ok(self.formatter.format_success(&format!(
                "Cache cleared for {provider} ({model}) in current repository."
            )))
        } else {
            let removed = cache.clear_provider(&provider);
            debug!("Removed {removed} cache entr(ies) for {provider}");
            Ok(self
                .formatter
                .format_success(&format!("All caches cleared for {provider}.")))
        }
    }

    pub fn format_error(&self, message: &str) -> String {
        self.formatter.format_error(message)
    }
}
