//! Chain discovery - decomposes a cognate graph into map-ready chains
//!
//! - [`extractor`]: depth-first walk, one chain per connected component
//! - [`jitter`]: spreads words that share a base coordinate
//! - [`enricher`]: per-request language lookup with memoization

pub mod enricher;
pub mod extractor;
pub mod jitter;

pub use enricher::LanguageEnricher;
pub use extractor::ChainExtractor;
pub use jitter::CoordinateDeduplicator;

use serde::{Deserialize, Serialize};
use crate::language::LanguageInfo;

/// One word of a chain, decorated for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainWord {
    pub word: String,
    /// Empty when the originating pair carries none for this side
    pub transliteration: String,
    /// Language record with jittered coordinates
    pub language: LanguageInfo,
}

/// Words of one connected component, in visitation order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CognateChain {
    pub words: Vec<ChainWord>,
}

impl CognateChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, word: ChainWord) {
        self.words.push(word);
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainWord> {
        self.words.iter()
    }

    /// Whether the chain holds `word` in the language with code `language`
    pub fn contains(&self, word: &str, language: &str) -> bool {
        self.words
            .iter()
            .any(|w| w.word == word && w.language.code == language)
    }
}

/// Chains discovered for one concept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainQueryResult {
    pub concept_id: String,
    pub chains: Vec<CognateChain>,
}

impl ChainQueryResult {
    pub fn empty(concept_id: impl Into<String>) -> Self {
        Self {
            concept_id: concept_id.into(),
            chains: Vec::new(),
        }
    }

    /// Total number of words across all chains
    pub fn word_count(&self) -> usize {
        self.chains.iter().map(CognateChain::len).sum()
    }
}
