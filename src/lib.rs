pub mod cli;
pub mod config;
pub mod context;
pub mod git;
pub mod providers;

pub use cli::{Cli, CommandHandler, Commands};
pub use config::{CommitFormat, Settings};
pub use context::ContextCache;
pub use git::GitRepo;
