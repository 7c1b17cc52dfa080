//! Model backend adapters.
//!
//! ## Available Adapters
//!
//! - `OllamaClient` - embeddings and chat over an Ollama-compatible HTTP API
//! - `HashingEmbedder` - deterministic offline embeddings
//! - `ScriptedGenerator` / `ScriptedEmbedder` - replayable doubles for tests

mod hashing_embedder;
mod ollama;
mod scripted;

pub use hashing_embedder::{HashingEmbedder, DEFAULT_DIMENSIONS};
pub use ollama::{OllamaClient, OllamaConfig};
pub use scripted::{ScriptedEmbedder, ScriptedGenerator};
