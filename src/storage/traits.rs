//! Record store interface consumed by the chain engine and search service

use crate::Result;
use crate::cognate::CognatePair;
use crate::language::LanguageInfo;

/// One prefix-index hit: a word, its language code and its concept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixEntry {
    pub word: String,
    pub language: String,
    pub concept_id: String,
}

impl PrefixEntry {
    /// Parse the stored `word|language|concept_id` form.
    ///
    /// Returns `None` unless there are exactly three parts.
    pub fn parse(entry: &str) -> Option<Self> {
        let mut parts = entry.split('|');
        let (word, language, concept_id) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            word: word.to_string(),
            language: language.to_string(),
            concept_id: concept_id.to_string(),
        })
    }

    pub fn encode(word: &str, language: &str, concept_id: &str) -> String {
        format!("{}|{}|{}", word, language, concept_id)
    }
}

/// Read-only view of the cognate record store.
///
/// Absence is not failure: an unknown concept yields an empty pair list.
/// Only `language_info` reports absence as [`crate::Error::NotFound`].
/// Undecodable records surface as [`crate::Error::Corrupt`] and backend
/// failures as [`crate::Error::StoreUnavailable`].
pub trait CognateStore {
    /// All pairs recorded for a concept, in insertion order
    fn cognate_pairs(&self, concept_id: &str) -> Result<Vec<CognatePair>>;

    /// The language record for a code
    fn language_info(&self, code: &str) -> Result<LanguageInfo>;

    /// Word entries indexed under an exact (already lower-cased) prefix
    fn prefix_entries(&self, prefix: &str) -> Result<Vec<PrefixEntry>>;
}
