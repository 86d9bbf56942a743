//! Section table: `title, heading, content, tokens`.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use studentia_core::error::{Error, Result};
use studentia_core::types::{DocumentSection, SectionKey};

#[derive(Debug, Deserialize)]
struct SectionRow {
    title: String,
    heading: String,
    content: String,
    #[serde(alias = "tokens", alias = "token")]
    token_count: usize,
}

/// In-memory section table keyed by `(title, heading)`.
#[derive(Debug, Default)]
pub struct CorpusStore {
    sections: HashMap<SectionKey, DocumentSection>,
}

impl CorpusStore {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| Error::CorpusLoad(format!("cannot open {}: {}", path.display(), e)))?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
        let mut sections = Vec::new();
        for (row_num, row) in reader.deserialize::<SectionRow>().enumerate() {
            let row = row.map_err(|e| Error::CorpusLoad(format!("section row {}: {}", row_num + 1, e)))?;
            sections.push(DocumentSection {
                key: SectionKey::new(row.title, row.heading),
                content: row.content,
                token_count: row.token_count,
            });
        }
        Self::from_sections(sections)
    }

    /// Build from already parsed sections. Rejects duplicate keys and an empty table.
    pub fn from_sections(sections: impl IntoIterator<Item = DocumentSection>) -> Result<Self> {
        let mut by_key = HashMap::new();
        for section in sections {
            if by_key.contains_key(&section.key) {
                return Err(Error::CorpusLoad(format!("duplicate section {}", section.key)));
            }
            by_key.insert(section.key.clone(), section);
        }
        if by_key.is_empty() {
            return Err(Error::CorpusLoad("section table is empty".to_string()));
        }
        Ok(Self { sections: by_key })
    }

    pub fn lookup_section(&self, key: &SectionKey) -> Result<&DocumentSection> {
        self.sections.get(key).ok_or_else(|| Error::NotFound(key.clone()))
    }

    pub fn contains(&self, key: &SectionKey) -> bool {
        self.sections.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &SectionKey> {
        self.sections.keys()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
