//! Precomputed embedding table: `title, heading, 0, 1, ..., N-1`.
//!
//! Vector columns may also be spelled `dim_0 .. dim_{N-1}`. Every row must
//! carry exactly N finite floats; anything else is a load error because a
//! partially populated index would silently skew the ranking.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use studentia_core::error::{Error, Result};
use studentia_core::types::{EmbeddingVector, SectionKey};

/// Ordered map from section key to its embedding. Iteration follows key order.
#[derive(Debug, Default)]
pub struct EmbeddingIndex {
    vectors: BTreeMap<SectionKey, EmbeddingVector>,
    dim: usize,
}

impl EmbeddingIndex {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| Error::CorpusLoad(format!("cannot open {}: {}", path.display(), e)))?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        // `flexible(false)` makes the csv reader reject ragged rows outright.
        let mut reader = csv::ReaderBuilder::new().has_headers(true).flexible(false).from_reader(reader);
        let headers = reader.headers().map_err(load_err)?.clone();
        let layout = ColumnLayout::from_headers(&headers)?;

        let mut entries = Vec::new();
        for (row_num, record) in reader.records().enumerate() {
            let record = record.map_err(|e| Error::CorpusLoad(format!("embedding row {}: {}", row_num + 1, e)))?;
            let field = |idx: usize| record.get(idx).unwrap_or_default();
            let key = SectionKey::new(field(layout.title), field(layout.heading));
            let mut vector = Vec::with_capacity(layout.dims.len());
            for (dim, &col) in layout.dims.iter().enumerate() {
                let raw = field(col).trim();
                let value: f32 = raw.parse().map_err(|_| {
                    Error::CorpusLoad(format!("embedding row {} {}: dim {} is not a number ({:?})", row_num + 1, key, dim, raw))
                })?;
                if !value.is_finite() {
                    return Err(Error::CorpusLoad(format!("embedding row {} {}: dim {} is not finite", row_num + 1, key, dim)));
                }
                vector.push(value);
            }
            entries.push((key, vector));
        }
        Self::from_entries(entries)
    }

    /// Build from in-memory vectors. All vectors must share one non-zero
    /// dimensionality and keys must be unique.
    pub fn from_entries(entries: impl IntoIterator<Item = (SectionKey, EmbeddingVector)>) -> Result<Self> {
        let mut vectors = BTreeMap::new();
        let mut dim = None;
        for (key, vector) in entries {
            let expected = *dim.get_or_insert(vector.len());
            if vector.len() != expected {
                return Err(Error::CorpusLoad(format!(
                    "ragged embedding for {}: {} dims, expected {}",
                    key,
                    vector.len(),
                    expected
                )));
            }
            if vectors.contains_key(&key) {
                return Err(Error::CorpusLoad(format!("duplicate embedding for {}", key)));
            }
            vectors.insert(key, vector);
        }
        match dim {
            None => Err(Error::CorpusLoad("embedding table is empty".to_string())),
            Some(0) => Err(Error::CorpusLoad("embedding vectors have no dimensions".to_string())),
            Some(dim) => Ok(Self { vectors, dim }),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn get(&self, key: &SectionKey) -> Option<&EmbeddingVector> {
        self.vectors.get(key)
    }

    pub fn contains(&self, key: &SectionKey) -> bool {
        self.vectors.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SectionKey, &EmbeddingVector)> {
        self.vectors.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &SectionKey> {
        self.vectors.keys()
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// Positions of the key columns and of each vector dimension in the header.
struct ColumnLayout {
    title: usize,
    heading: usize,
    dims: Vec<usize>,
}

impl ColumnLayout {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let mut title = None;
        let mut heading = None;
        let mut by_dim: BTreeMap<usize, usize> = BTreeMap::new();
        for (col, name) in headers.iter().enumerate() {
            match name.trim() {
                "title" => title = Some(col),
                "heading" => heading = Some(col),
                other => {
                    let dim = parse_dim_header(other).ok_or_else(|| {
                        Error::CorpusLoad(format!("unexpected embedding column {:?}", other))
                    })?;
                    if by_dim.insert(dim, col).is_some() {
                        return Err(Error::CorpusLoad(format!("embedding column {} appears twice", dim)));
                    }
                }
            }
        }
        let title = title.ok_or_else(|| Error::CorpusLoad("embedding table has no 'title' column".to_string()))?;
        let heading = heading.ok_or_else(|| Error::CorpusLoad("embedding table has no 'heading' column".to_string()))?;
        // Dimensions must be exactly 0..N-1 with no gaps.
        for (expected, dim) in by_dim.keys().enumerate() {
            if *dim != expected {
                return Err(Error::CorpusLoad(format!("embedding column {} is missing", expected)));
            }
        }
        Ok(Self { title, heading, dims: by_dim.into_values().collect() })
    }
}

fn parse_dim_header(name: &str) -> Option<usize> {
    name.strip_prefix("dim_").unwrap_or(name).parse().ok()
}

fn load_err(e: csv::Error) -> Error {
    Error::CorpusLoad(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::parse_dim_header;

    #[test]
    fn dim_headers_accept_bare_and_prefixed_indices() {
        assert_eq!(parse_dim_header("0"), Some(0));
        assert_eq!(parse_dim_header("dim_41"), Some(41));
        assert_eq!(parse_dim_header("content"), None);
        assert_eq!(parse_dim_header("dim_x"), None);
    }
}
