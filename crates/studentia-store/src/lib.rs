//! Static knowledge base: the section table plus its precomputed embeddings.
//!
//! Both tables are loaded once at start-up, validated against each other and
//! never mutated afterwards, so a `KnowledgeBase` can be shared across
//! request handlers behind an `Arc` without locking.

pub mod corpus;
pub mod embeddings;

use std::path::Path;

use studentia_core::error::{Error, Result};
use studentia_core::types::{DocumentSection, SectionKey};

pub use corpus::CorpusStore;
pub use embeddings::EmbeddingIndex;

#[derive(Debug)]
pub struct KnowledgeBase {
    corpus: CorpusStore,
    index: EmbeddingIndex,
}

impl KnowledgeBase {
    /// Pair a corpus with its index, failing with `KeyMismatch` unless both
    /// cover exactly the same `(title, heading)` keys.
    pub fn new(corpus: CorpusStore, index: EmbeddingIndex) -> Result<Self> {
        let mut only_in_corpus: Vec<SectionKey> = corpus.keys().filter(|k| !index.contains(k)).cloned().collect();
        let only_in_index: Vec<SectionKey> = index.keys().filter(|k| !corpus.contains(k)).cloned().collect();
        if !only_in_corpus.is_empty() || !only_in_index.is_empty() {
            only_in_corpus.sort();
            return Err(Error::KeyMismatch { only_in_corpus, only_in_index });
        }
        Ok(Self { corpus, index })
    }

    pub fn load(sections_csv: &Path, embeddings_csv: &Path) -> Result<Self> {
        let corpus = CorpusStore::load(sections_csv)?;
        let index = EmbeddingIndex::load(embeddings_csv)?;
        let kb = Self::new(corpus, index)?;
        tracing::info!(
            sections = kb.len(),
            dim = kb.dimension(),
            sections_csv = %sections_csv.display(),
            embeddings_csv = %embeddings_csv.display(),
            "knowledge base loaded"
        );
        Ok(kb)
    }

    pub fn lookup_section(&self, key: &SectionKey) -> Result<&DocumentSection> {
        self.corpus.lookup_section(key)
    }

    pub fn all_embeddings(&self) -> &EmbeddingIndex {
        &self.index
    }

    pub fn corpus(&self) -> &CorpusStore {
        &self.corpus
    }

    pub fn dimension(&self) -> usize {
        self.index.dim()
    }

    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }
}
