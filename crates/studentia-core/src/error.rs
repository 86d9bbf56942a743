use thiserror::Error;

use crate::types::SectionKey;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to load corpus: {0}")]
    CorpusLoad(String),

    #[error(
        "Corpus and embedding index keys differ: {} only in corpus {}, {} only in index {}",
        .only_in_corpus.len(),
        format_keys(.only_in_corpus),
        .only_in_index.len(),
        format_keys(.only_in_index)
    )]
    KeyMismatch { only_in_corpus: Vec<SectionKey>, only_in_index: Vec<SectionKey> },

    #[error("Embedding provider unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Query embedding has {actual} dimensions, index expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Section not found: {0}")]
    NotFound(SectionKey),

    #[error("Completion provider unavailable: {0}")]
    CompletionUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;

fn format_keys(keys: &[SectionKey]) -> String {
    let shown: Vec<String> = keys.iter().take(5).map(ToString::to_string).collect();
    if keys.len() > shown.len() {
        format!("[{}, ...]", shown.join(", "))
    } else {
        format!("[{}]", shown.join(", "))
    }
}
