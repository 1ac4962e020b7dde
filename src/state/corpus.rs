//! The law corpus: an insertion-ordered map of law name to law text

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Mapping from law display name to extracted text
///
/// Entries keep the order they were first inserted in. Inserting a name
/// that is already present replaces its text in place, so the last write
/// wins but the entry keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl Corpus {
    /// Creates an empty corpus
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an entry, returning the previous text if any
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) -> Option<String> {
        let name = name.into();
        let text = text.into();

        if let Some(&position) = self.index.get(&name) {
            return Some(std::mem::replace(&mut self.entries[position].1, text));
        }

        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, text));
        None
    }

    /// Looks up the text stored for a law name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|&position| self.entries[position].1.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, text)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, text)| (name.as_str(), text.as_str()))
    }

    /// Law names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Number of entries whose text is empty
    pub fn empty_count(&self) -> usize {
        self.entries.iter().filter(|(_, text)| text.is_empty()).count()
    }
}

impl Serialize for Corpus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, text) in &self.entries {
            map.serialize_entry(name, text)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Corpus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CorpusVisitor;

        impl<'de> Visitor<'de> for CorpusVisitor {
            type Value = Corpus;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of law names to law text")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Corpus, A::Error> {
                let mut corpus = Corpus::new();
                while let Some((name, text)) = access.next_entry::<String, String>()? {
                    corpus.insert(name, text);
                }
                Ok(corpus)
            }
        }

        deserializer.deserialize_map(CorpusVisitor)
    }
}
