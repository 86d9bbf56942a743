use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

use studentia_core::error::Result;
use studentia_core::traits::Embedder;
use studentia_core::types::EmbeddingVector;

/// Bag-of-hashed-words embedder. Deterministic and L2-normalised, no network.
pub struct FakeEmbedder {
    dim: usize,
}

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }
}

impl Embedder for FakeEmbedder {
    fn dim(&self) -> Option<usize> {
        Some(self.dim)
    }

    fn embed(&self, text: &str) -> Result<EmbeddingVector> {
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.to_lowercase().hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        Ok(v)
    }
}
