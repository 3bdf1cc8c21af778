use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};

use crate::config::defaults::PROVIDER_NAMES;
use crate::config::CommitFormat;

#[derive(Parser)]
#[command(name = "scrive")]
#[command(about = "AI-powered commit message generator")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a commit message from the staged changes
    Gen(GenArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Cache management
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Args)]
pub struct GenArgs {
    /// AI provider to use (overrides the configured default)
    #[arg(short, long, value_parser = PossibleValuesParser::new(PROVIDER_NAMES))]
    pub provider: Option<String>,

    /// Commit message format
    #[arg(short, long, value_enum)]
    pub format: Option<CommitFormat>,

    /// Automatically commit after generating the message
    #[arg(short, long)]
    pub auto: bool,

    /// Clear the context cache before generating
    #[arg(long)]
    pub clear_context: bool,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Create a new configuration file with defaults
    Create,
    /// Update stored settings
    Update(UpdateArgs),
    /// Show the current configuration
    Show,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// AI provider to configure
    #[arg(short, long, value_parser = PossibleValuesParser::new(PROVIDER_NAMES))]
    pub provider: Option<String>,

    /// API key for the provider
    #[arg(short, long)]
    pub api_key: Option<String>,

    /// API endpoint for the provider
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Model to use with the provider
    #[arg(short, long)]
    pub model: Option<String>,

    /// Maximum tokens for generation
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Temperature for generation
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Default commit message format
    #[arg(short, long, value_enum)]
    pub format: Option<CommitFormat>,

    /// Enable or disable auto-commit
    #[arg(long)]
    pub auto_commit: Option<bool>,

    /// Enable or disable response caching
    #[arg(long)]
    pub cache_responses: Option<bool>,

    /// Set the specified provider as the default
    #[arg(long)]
    pub set_default: bool,
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Clear cached context entries
    Clear(ClearArgs),
}

#[derive(Args)]
pub struct ClearArgs {
    /// Provider to clear cache entries for
    #[arg(short, long, value_parser = PossibleValuesParser::new(PROVIDER_NAMES))]
    pub provider: Option<String>,

    /// Model to clear cache entries for (with --provider)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Clear every cache entry
    #[arg(short, long)]
    pub all: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn gen_accepts_provider_and_format() {
        let cli = Cli::try_parse_from([
            "scrive",
            "gen",
            "--provider",
            "ollama",
            "--format",
            "angular",
            "--clear-context",
        ])
        .unwrap();

        let Commands::Gen(args) = cli.command else {
            panic!("expected gen");
        };
        assert_eq!(args.provider.as_deref(), Some("ollama"));
        assert_eq!(args.format, Some(CommitFormat::Angular));
        assert!(args.clear_context);
        assert!(!args.auto);
    }

    #[test]
    fn gen_rejects_unrecognized_provider() {
        assert!(Cli::try_parse_from(["scrive", "gen", "--provider", "replicate"]).is_err());
    }

    #[test]
    fn gen_rejects_unrecognized_format() {
        assert!(Cli::try_parse_from(["scrive", "gen", "--format", "haiku"]).is_err());
    }

    #[test]
    fn cache_clear_parses_all_and_provider_modes() {
        let cli = Cli::try_parse_from(["scrive", "cache", "clear", "--all"]).unwrap();
        let Commands::Cache {
            command: CacheCommands::Clear(args),
        } = cli.command
        else {
            panic!("expected cache clear");
        };
        assert!(args.all);

        let cli =
            Cli::try_parse_from(["scrive", "cache", "clear", "--provider", "anthropic"]).unwrap();
        let Commands::Cache {
            command: CacheCommands::Clear(args),
        } = cli.command
        else {
            panic!("expected cache clear");
        };
        assert_eq!(args.provider.as_deref(), Some("anthropic"));
        assert_eq!(args.model, None);
    }
}
