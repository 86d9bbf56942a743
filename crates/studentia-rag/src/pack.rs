use studentia_core::error::Result;
use studentia_core::types::{PackedContext, RankedCandidate};
use studentia_store::CorpusStore;

/// Greedy context packer.
///
/// Walks candidates best first and stops at the first one whose cost would
/// push the running total past the budget. Lower-ranked candidates are never
/// considered after that, even if they would fit on their own.
#[derive(Debug, Clone)]
pub struct ContextPacker {
    separator: String,
    separator_tokens: usize,
}

impl ContextPacker {
    /// `separator_tokens` is the separator's length under the same tokenizer
    /// that produced the corpus token counts.
    pub fn new(separator: impl Into<String>, separator_tokens: usize) -> Self {
        Self { separator: separator.into(), separator_tokens }
    }

    pub fn pack(&self, ranked: &[RankedCandidate], corpus: &CorpusStore, token_budget: usize) -> Result<PackedContext> {
        let mut packed = PackedContext::default();
        for candidate in ranked {
            let section = corpus.lookup_section(&candidate.key)?;
            let cost = section.token_count.saturating_add(self.separator_tokens);
            let total = match packed.token_total.checked_add(cost) {
                Some(total) if total <= token_budget => total,
                _ => {
                    tracing::debug!(rejected = %candidate.key, cost, running_total = packed.token_total, token_budget, "context budget reached");
                    break;
                }
            };
            packed.snippets.push(format!("{}{}", self.separator, section.content.replace('\n', " ")));
            packed.keys.push(candidate.key.clone());
            packed.token_total = total;
        }
        Ok(packed)
    }
}
