//! Cognate search service
//!
//! High-level operations exposed to the CLI and HTTP layer:
//! - Word suggestions from the prefix index
//! - Raw pair listing for a concept
//! - Chain discovery (graph build, extraction, optional filtering)

use serde::{Deserialize, Serialize};
use crate::{Error, Result};
use crate::chain::{ChainExtractor, ChainQueryResult, CoordinateDeduplicator, LanguageEnricher};
use crate::cognate::CognatePair;
use crate::graph::{CognateGraph, GraphStats};
use crate::language::LanguageInfo;
use crate::storage::CognateStore;

/// Shortest prefix that produces suggestions
pub const MIN_PREFIX_LEN: usize = 2;

/// Maximum number of suggestions returned
pub const SUGGESTION_LIMIT: usize = 10;

/// A word matching a typed prefix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordSuggestion {
    pub word: String,
    /// Language code
    pub language: String,
    /// Language record, when one is stored for the code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_info: Option<LanguageInfo>,
    pub concept_id: String,
}

/// Search service over a record store
pub struct CognateSearch<'a, S: CognateStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: CognateStore + ?Sized> CognateSearch<'a, S> {
    /// Create a new search service
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Suggest words starting with `prefix` (case-insensitive).
    ///
    /// Prefixes shorter than [`MIN_PREFIX_LEN`] characters yield nothing.
    /// Results are deduplicated by word, first occurrence wins, and capped
    /// at [`SUGGESTION_LIMIT`].
    pub fn suggest_words(&self, prefix: &str) -> Result<Vec<WordSuggestion>> {
        if prefix.chars().count() < MIN_PREFIX_LEN {
            return Ok(Vec::new());
        }

        let prefix = prefix.to_lowercase();
        let entries = self.store.prefix_entries(&prefix)?;

        let mut enricher = LanguageEnricher::new(self.store);
        let mut seen = std::collections::HashSet::new();
        let mut suggestions = Vec::new();

        for entry in entries {
            if !seen.insert(entry.word.clone()) {
                continue;
            }

            let language_info = enricher.resolve(&entry.language)?;
            suggestions.push(WordSuggestion {
                word: entry.word,
                language: entry.language,
                language_info,
                concept_id: entry.concept_id,
            });

            if suggestions.len() >= SUGGESTION_LIMIT {
                break;
            }
        }

        Ok(suggestions)
    }

    /// All pairs recorded for a concept
    pub fn cognates_by_concept(&self, concept_id: &str) -> Result<Vec<CognatePair>> {
        self.store.cognate_pairs(concept_id)
    }

    /// Size of a concept's cognate graph
    pub fn concept_graph_stats(&self, concept_id: &str) -> Result<GraphStats> {
        let pairs = self.store.cognate_pairs(concept_id)?;
        Ok(CognateGraph::from_pairs(&pairs).stats())
    }

    /// Discover the cognate chains of a concept.
    ///
    /// With both `word` and `language` given, only the first chain holding
    /// that word in that language is returned (none if no chain does).
    /// Any store failure is reported as [`Error::ChainDiscovery`].
    pub fn find_cognate_chains(
        &self,
        concept_id: &str,
        word: Option<&str>,
        language: Option<&str>,
    ) -> Result<ChainQueryResult> {
        self.discover(concept_id, word, language)
            .map_err(Error::chain_discovery)
    }

    fn discover(
        &self,
        concept_id: &str,
        word: Option<&str>,
        language: Option<&str>,
    ) -> Result<ChainQueryResult> {
        let pairs = self.store.cognate_pairs(concept_id)?;
        let graph = CognateGraph::from_pairs(&pairs);
        if graph.is_empty() {
            tracing::debug!("No cognate pairs for concept {}", concept_id);
            return Ok(ChainQueryResult::empty(concept_id));
        }

        let mut enricher = LanguageEnricher::new(self.store);
        let mut dedup = CoordinateDeduplicator::new();

        let chains = ChainExtractor::new(&graph)
            .extract(|code| enricher.resolve(code), &mut dedup)?;

        tracing::debug!(
            "Concept {}: {} pairs ({}), {} chains, {} language lookups",
            concept_id,
            pairs.len(),
            graph.stats(),
            chains.len(),
            enricher.lookups()
        );

        let chains = match (word, language) {
            (Some(word), Some(language)) => chains
                .into_iter()
                .find(|chain| chain.contains(word, language))
                .into_iter()
                .collect(),
            _ => chains,
        };

        Ok(ChainQueryResult {
            concept_id: concept_id.to_string(),
            chains,
        })
    }
}
