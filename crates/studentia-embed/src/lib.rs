//! Provider clients: query embeddings, prompt completions and tokenizer
//! helpers. All network calls are blocking and made without retries; the
//! caller owns timeouts through the settings it passes in.

mod fake;
pub mod openai;
pub mod tokenize;

use anyhow::Result;
use std::time::Duration;

use studentia_core::config::EmbeddingSettings;
use studentia_core::traits::Embedder;

pub use fake::FakeEmbedder;
pub use openai::{OpenAiCompleter, OpenAiEmbedder};
pub use tokenize::separator_token_len;

/// Pick the embedder for this process.
///
/// `APP_USE_FAKE_EMBEDDINGS=1` selects the deterministic [`FakeEmbedder`]
/// with dimensionality `dim`; otherwise the OpenAI client is built and an API
/// key is required.
pub fn get_default_embedder(settings: &EmbeddingSettings, api_key: Option<String>, dim: usize) -> Result<Box<dyn Embedder>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false);
    if use_fake {
        tracing::info!(dim, "using fake embedder");
        return Ok(Box::new(FakeEmbedder::new(dim)));
    }
    let api_key = api_key.ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY must be set for the embedding provider"))?;
    let embedder = OpenAiEmbedder::new(
        api_key,
        settings.base_url.clone(),
        settings.model.clone(),
        Duration::from_secs(settings.timeout_secs),
    )?;
    Ok(Box::new(embedder))
}
