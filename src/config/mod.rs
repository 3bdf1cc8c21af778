pub mod defaults;
pub mod format;
pub mod settings;

pub use format::CommitFormat;
pub use settings::{CoreConfig, ProviderConfig, Settings};
