use anyhow::{anyhow, Result};
use std::path::Path;
use tokenizers::Tokenizer;

/// Number of tokens `separator` occupies under the tokenizer stored at
/// `tokenizer_path` (a HuggingFace `tokenizer.json`). Special tokens are not
/// added, so the count reflects the separator alone.
pub fn separator_token_len(tokenizer_path: &Path, separator: &str) -> Result<usize> {
    let tokenizer = Tokenizer::from_file(tokenizer_path)
        .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
    let enc = tokenizer.encode(separator, false).map_err(|e| anyhow!("Tokenization failed: {}", e))?;
    Ok(enc.get_ids().len())
}
