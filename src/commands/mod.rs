//! CLI command implementations.

pub mod collect;
pub mod summarize;

pub use collect::CollectCommand;
pub use summarize::SummarizeCommand;
