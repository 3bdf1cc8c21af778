pub mod cache;

pub use cache::ContextCache;
