pub mod args;
pub mod commands;
pub mod output;

pub use args::{CacheCommands, Cli, Commands, ConfigCommands};
pub use commands::CommandHandler;
pub use output::{OutputFormatter, Spinner};
