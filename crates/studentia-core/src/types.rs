//! Domain types shared by the store, the ranker and the prompt pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense vector produced by the embedding provider.
pub type EmbeddingVector = Vec<f32>;

/// Compound identity of a document section.
///
/// Ordering is lexicographic on `title`, then `heading`; the ranker relies on
/// it to break score ties deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SectionKey {
    pub title: String,
    pub heading: String,
}

impl SectionKey {
    pub fn new(title: impl Into<String>, heading: impl Into<String>) -> Self {
        Self { title: title.into(), heading: heading.into() }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.title, self.heading)
    }
}

/// A titled, headed chunk of source text with its precomputed token cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSection {
    pub key: SectionKey,
    pub content: String,
    pub token_count: usize,
}

/// One scored entry of a ranking. Higher `score` is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub score: f32,
    pub key: SectionKey,
}

/// Context block selected for a single prompt.
///
/// - `snippets`: included section contents, each already carrying the separator prefix
/// - `token_total`: summed cost of the included sections (content + separator)
/// - `keys`: included sections, in inclusion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedContext {
    pub snippets: Vec<String>,
    pub token_total: usize,
    pub keys: Vec<SectionKey>,
}

impl PackedContext {
    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    /// Concatenation of all snippets, in order.
    pub fn render(&self) -> String {
        self.snippets.concat()
    }
}
