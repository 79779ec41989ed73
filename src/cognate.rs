//! Cognate records - the raw, pairwise relationships the graph is built from
//!
//! A [`CognatePair`] documents that `word1` in `lang1` and `word2` in `lang2`
//! descend from the same etymon (grouped under a concept ID). Each side of a
//! pair is identified by a [`NodeId`], the `(language, word)` identity used as
//! the graph key.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a word in the cognate graph: `(language code, word)`.
///
/// Ordering is lexicographic by language code, then word; the chain
/// extractor relies on it as its tie-break.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    pub language: String,
    pub word: String,
}

impl NodeId {
    pub fn new(language: impl Into<String>, word: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            word: word.into(),
        }
    }

    fn is(&self, language: &str, word: &str) -> bool {
        self.language == language && self.word == word
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.language, self.word)
    }
}

/// One documented cognate relationship, scoped to a concept.
///
/// Transliterations are empty strings when absent and are left out of the
/// JSON encoding in that case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CognatePair {
    pub concept_id: String,
    pub lang1: String,
    pub word1: String,
    pub lang2: String,
    pub word2: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub translit1: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub translit2: String,
}

impl CognatePair {
    /// Create a pair without transliterations
    pub fn new(
        concept_id: impl Into<String>,
        lang1: impl Into<String>,
        word1: impl Into<String>,
        lang2: impl Into<String>,
        word2: impl Into<String>,
    ) -> Self {
        Self {
            concept_id: concept_id.into(),
            lang1: lang1.into(),
            word1: word1.into(),
            lang2: lang2.into(),
            word2: word2.into(),
            translit1: String::new(),
            translit2: String::new(),
        }
    }

    pub fn with_transliterations(
        mut self,
        translit1: impl Into<String>,
        translit2: impl Into<String>,
    ) -> Self {
        self.translit1 = translit1.into();
        self.translit2 = translit2.into();
        self
    }

    /// Identity of the first side
    pub fn node1(&self) -> NodeId {
        NodeId::new(&self.lang1, &self.word1)
    }

    /// Identity of the second side
    pub fn node2(&self) -> NodeId {
        NodeId::new(&self.lang2, &self.word2)
    }

    /// Transliteration recorded for the side matching `node`.
    ///
    /// The first slot wins when both sides share the same identity; a node
    /// that matches neither side gets an empty string.
    pub fn transliteration_for(&self, node: &NodeId) -> &str {
        if node.is(&self.lang1, &self.word1) {
            &self.translit1
        } else if node.is(&self.lang2, &self.word2) {
            &self.translit2
        } else {
            ""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_ordering_is_language_then_word() {
        let mut nodes = vec![
            NodeId::new("tur", "anne"),
            NodeId::new("eng", "mother"),
            NodeId::new("eng", "mama"),
        ];
        nodes.sort();
        let rendered: Vec<String> = nodes.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["eng:mama", "eng:mother", "tur:anne"]);
    }

    #[test]
    fn test_transliteration_follows_matching_side() {
        let pair = CognatePair::new("c1", "rus", "мать", "eng", "mother")
            .with_transliterations("mat'", "");

        assert_eq!(pair.transliteration_for(&pair.node1()), "mat'");
        assert_eq!(pair.transliteration_for(&pair.node2()), "");
        assert_eq!(pair.transliteration_for(&NodeId::new("deu", "Mutter")), "");
    }

    #[test]
    fn test_json_omits_empty_transliterations() {
        let pair = CognatePair::new("c1", "eng", "mother", "deu", "Mutter");
        let json = serde_json::to_value(&pair).unwrap();
        assert!(json.get("translit1").is_none());
        assert_eq!(json["concept_id"], "c1");

        let decoded: CognatePair = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, pair);
    }
}
