use crate::error::Result;
use crate::types::EmbeddingVector;

/// Text-to-vector capability backed by an external provider.
pub trait Embedder: Send + Sync {
    /// Dimensionality when known up front. Remote providers report `None`.
    fn dim(&self) -> Option<usize>;
    /// Embed a single text. Failures surface as `Error::EmbeddingUnavailable`.
    fn embed(&self, text: &str) -> Result<EmbeddingVector>;
}

/// Prompt-to-answer capability backed by a hosted completion model.
pub trait Completer: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String>;
}
