//! Retrieval-augmented prompt construction.
//!
//! A question is embedded, every indexed section is ranked against it, the
//! best sections are packed into a token-bounded context block and the block
//! is rendered into a completion prompt.

pub mod pack;
pub mod prompt;
pub mod rank;

use std::sync::Arc;

use studentia_core::error::{Error, Result};
use studentia_core::traits::{Completer, Embedder};
use studentia_core::types::{PackedContext, RankedCandidate};
use studentia_store::KnowledgeBase;

pub use pack::ContextPacker;
pub use prompt::{PromptBuilder, DEFAULT_HEADER};
pub use rank::{rank, vector_similarity};

/// Intermediate results of one retrieval, kept for diagnostics.
#[derive(Debug, Clone)]
pub struct Retrieval {
    pub ranked: Vec<RankedCandidate>,
    pub context: PackedContext,
}

pub struct PromptPipeline {
    kb: Arc<KnowledgeBase>,
    embedder: Box<dyn Embedder>,
    packer: ContextPacker,
    builder: PromptBuilder,
    token_budget: usize,
}

impl PromptPipeline {
    pub fn new(
        kb: Arc<KnowledgeBase>,
        embedder: Box<dyn Embedder>,
        packer: ContextPacker,
        builder: PromptBuilder,
        token_budget: usize,
    ) -> Self {
        Self { kb, embedder, packer, builder, token_budget }
    }

    pub fn retrieve(&self, question: &str) -> Result<Retrieval> {
        let query_vector = self.embedder.embed(question)?;
        let expected = self.kb.dimension();
        if query_vector.len() != expected {
            return Err(Error::DimensionMismatch { expected, actual: query_vector.len() });
        }
        let ranked = rank(&query_vector, self.kb.all_embeddings());
        let context = self.packer.pack(&ranked, self.kb.corpus(), self.token_budget)?;
        tracing::debug!(
            candidates = ranked.len(),
            top_score = ranked.first().map(|c| c.score),
            included = context.len(),
            token_total = context.token_total,
            token_budget = self.token_budget,
            "context packed"
        );
        Ok(Retrieval { ranked, context })
    }

    pub fn construct_prompt(&self, question: &str) -> Result<String> {
        let retrieval = self.retrieve(question)?;
        Ok(self.builder.build(question, &retrieval.context))
    }

    /// Build the prompt and hand it to `completer`, returning its answer.
    pub fn answer(&self, question: &str, completer: &dyn Completer) -> Result<String> {
        let prompt = self.construct_prompt(question)?;
        completer.complete(&prompt)
    }

    pub fn render(&self, question: &str, retrieval: &Retrieval) -> String {
        self.builder.build(question, &retrieval.context)
    }
}
