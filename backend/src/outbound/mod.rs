//! Outbound adapters: persistence, in-memory fallbacks, and the LLM client.

pub mod llm;
pub mod memory;
pub mod persistence;
