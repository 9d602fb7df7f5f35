//! Outbound adapter for the LLM completion provider.

mod dto;
mod http_completion;

pub use http_completion::{CompletionClientConfig, HttpCompletionClient};
