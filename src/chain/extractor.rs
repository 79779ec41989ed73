//! Chain extraction - one chain per connected component
//!
//! Walks the graph depth-first, pre-order: a node's word is emitted before
//! any of its neighbors are entered. Start nodes and neighbors are taken in
//! lexicographic order, so the output is reproducible. The walk uses an
//! explicit stack, so chain length is not bounded by the call stack.

use std::collections::{BTreeSet, btree_map};
use crate::Result;
use crate::cognate::{CognatePair, NodeId};
use crate::graph::CognateGraph;
use crate::language::LanguageInfo;
use super::{ChainWord, CognateChain, CoordinateDeduplicator};

/// Extracts chains from a single concept's graph
pub struct ChainExtractor<'g> {
    graph: &'g CognateGraph,
}

impl<'g> ChainExtractor<'g> {
    pub fn new(graph: &'g CognateGraph) -> Self {
        Self { graph }
    }

    /// Decompose the graph into chains.
    ///
    /// `enrich` resolves a language code; `Ok(None)` omits the node from its
    /// chain without stopping the walk, while `Err` aborts the extraction.
    /// Every node is visited exactly once across all chains. A component
    /// whose nodes all fail enrichment yields no chain.
    pub fn extract<F>(
        &self,
        mut enrich: F,
        dedup: &mut CoordinateDeduplicator,
    ) -> Result<Vec<CognateChain>>
    where
        F: FnMut(&str) -> Result<Option<LanguageInfo>>,
    {
        let mut visited: BTreeSet<&'g NodeId> = BTreeSet::new();
        let mut chains = Vec::new();

        for start in self.graph.nodes() {
            if visited.contains(start) {
                continue;
            }

            let chain = self.walk(start, &mut visited, &mut enrich, dedup)?;
            if chain.is_empty() {
                tracing::debug!("Component starting at {} produced no renderable words", start);
                continue;
            }
            chains.push(chain);
        }

        Ok(chains)
    }

    /// Depth-first walk from `start`, marking every reached node in `visited`
    fn walk<F>(
        &self,
        start: &'g NodeId,
        visited: &mut BTreeSet<&'g NodeId>,
        enrich: &mut F,
        dedup: &mut CoordinateDeduplicator,
    ) -> Result<CognateChain>
    where
        F: FnMut(&str) -> Result<Option<LanguageInfo>>,
    {
        let mut chain = CognateChain::new();

        visited.insert(start);
        // The start node has no incoming edge; its first link supplies the
        // transliteration.
        let origin = self.graph.neighbors(start).and_then(|n| n.values().next());
        self.emit(start, origin, &mut chain, enrich, dedup)?;

        let mut stack: Vec<btree_map::Iter<'g, NodeId, CognatePair>> = vec![self.neighbor_iter(start)];

        while let Some(frame) = stack.last_mut() {
            match frame.next() {
                Some((next, via)) => {
                    // Already placed (cycle or shared neighbor)
                    if !visited.insert(next) {
                        continue;
                    }
                    self.emit(next, Some(via), &mut chain, enrich, dedup)?;
                    stack.push(self.neighbor_iter(next));
                }
                None => {
                    stack.pop();
                }
            }
        }

        Ok(chain)
    }

    fn neighbor_iter(&self, node: &NodeId) -> btree_map::Iter<'g, NodeId, CognatePair> {
        match self.graph.neighbors(node) {
            Some(neighbors) => neighbors.iter(),
            None => EMPTY.iter(),
        }
    }

    /// Enrich one node and append it to the chain
    fn emit<F>(
        &self,
        node: &NodeId,
        origin: Option<&CognatePair>,
        chain: &mut CognateChain,
        enrich: &mut F,
        dedup: &mut CoordinateDeduplicator,
    ) -> Result<()>
    where
        F: FnMut(&str) -> Result<Option<LanguageInfo>>,
    {
        let Some(mut language) = enrich(&node.language)? else {
            tracing::debug!("Omitting {} from chain: unknown language", node);
            return Ok(());
        };

        language.coordinates = dedup.adjust(&language.coordinates);

        chain.push(ChainWord {
            word: node.word.clone(),
            transliteration: origin
                .map(|pair| pair.transliteration_for(node).to_string())
                .unwrap_or_default(),
            language,
        });
        Ok(())
    }
}

static EMPTY: btree_map::BTreeMap<NodeId, CognatePair> = btree_map::BTreeMap::new();

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::Error;

    fn pair(l1: &str, w1: &str, l2: &str, w2: &str) -> CognatePair {
        CognatePair::new("c1", l1, w1, l2, w2)
    }

    fn languages() -> HashMap<String, LanguageInfo> {
        [
            LanguageInfo::new("deu", "German", 51.0, 10.0),
            LanguageInfo::new("eng", "English", 52.0, -1.0),
            LanguageInfo::new("nld", "Dutch", 52.1, 5.3),
            LanguageInfo::new("tur", "Turkish", 39.0, 35.0),
        ]
        .into_iter()
        .map(|l| (l.code.clone(), l))
        .collect()
    }

    fn extract(pairs: &[CognatePair]) -> Vec<CognateChain> {
        let langs = languages();
        let graph = CognateGraph::from_pairs(pairs);
        let mut dedup = CoordinateDeduplicator::new();
        ChainExtractor::new(&graph)
            .extract(|code| Ok(langs.get(code).cloned()), &mut dedup)
            .unwrap()
    }

    fn words(chain: &CognateChain) -> Vec<String> {
        chain.iter().map(|w| format!("{}:{}", w.language.code, w.word)).collect()
    }

    #[test]
    fn test_empty_graph_has_no_chains() {
        assert!(extract(&[]).is_empty());
    }

    #[test]
    fn test_single_component_visits_each_node_once() {
        let chains = extract(&[
            pair("eng", "mother", "deu", "Mutter"),
            pair("deu", "Mutter", "nld", "moeder"),
            pair("nld", "moeder", "eng", "mother"),
            pair("eng", "mother", "tur", "mader"),
        ]);

        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].len(), 4);
    }

    #[test]
    fn test_cycle_terminates_without_duplicates() {
        let chains = extract(&[
            pair("eng", "a", "deu", "b"),
            pair("deu", "b", "nld", "c"),
            pair("nld", "c", "eng", "a"),
        ]);

        assert_eq!(chains.len(), 1);
        // Start at the smallest node, then lexicographic depth-first
        assert_eq!(words(&chains[0]), vec!["deu:b", "eng:a", "nld:c"]);
    }

    #[test]
    fn test_depth_first_preorder() {
        // deu:x is linked to eng:y and tur:z; eng:y continues to nld:w.
        let chains = extract(&[
            pair("deu", "x", "tur", "z"),
            pair("deu", "x", "eng", "y"),
            pair("eng", "y", "nld", "w"),
        ]);

        // nld:w is reached through eng:y before backtracking to tur:z
        assert_eq!(words(&chains[0]), vec!["deu:x", "eng:y", "nld:w", "tur:z"]);
    }

    #[test]
    fn test_disjoint_components_become_separate_chains() {
        let chains = extract(&[
            pair("eng", "mother", "deu", "Mutter"),
            pair("eng", "water", "deu", "Wasser"),
        ]);

        assert_eq!(chains.len(), 2);
        assert_eq!(words(&chains[0]), vec!["deu:Mutter", "eng:mother"]);
        assert_eq!(words(&chains[1]), vec!["deu:Wasser", "eng:water"]);
    }

    #[test]
    fn test_missing_language_omits_node_but_keeps_neighbors() {
        // deu:b sits in the middle and has no language record
        let pairs = [pair("eng", "a", "deu", "b"), pair("deu", "b", "nld", "c")];
        let mut langs = languages();
        langs.remove("deu");

        let graph = CognateGraph::from_pairs(&pairs);
        let mut dedup = CoordinateDeduplicator::new();
        let chains = ChainExtractor::new(&graph)
            .extract(|code| Ok(langs.get(code).cloned()), &mut dedup)
            .unwrap();

        assert_eq!(chains.len(), 1);
        assert_eq!(words(&chains[0]), vec!["eng:a", "nld:c"]);
    }

    #[test]
    fn test_unrenderable_component_is_dropped() {
        let pairs = [pair("xxx", "a", "yyy", "b"), pair("eng", "c", "deu", "d")];
        let chains = extract(&pairs);
        assert_eq!(chains.len(), 1);
        assert_eq!(words(&chains[0]), vec!["deu:d", "eng:c"]);
    }

    #[test]
    fn test_enrichment_error_aborts() {
        let graph = CognateGraph::from_pairs(&[pair("eng", "a", "deu", "b")]);
        let mut dedup = CoordinateDeduplicator::new();
        let result = ChainExtractor::new(&graph)
            .extract(|code| Err(Error::corrupt(code, "bad record")), &mut dedup);
        assert!(matches!(result, Err(Error::Corrupt { .. })));
    }

    #[test]
    fn test_transliteration_comes_from_matching_side() {
        let pairs = [
            pair("rus", "мать", "eng", "mother").with_transliterations("mat'", ""),
            pair("eng", "mother", "deu", "Mutter"),
        ];
        let mut langs = languages();
        langs.insert("rus".into(), LanguageInfo::new("rus", "Russian", 55.7, 37.6));

        let graph = CognateGraph::from_pairs(&pairs);
        let mut dedup = CoordinateDeduplicator::new();
        let chains = ChainExtractor::new(&graph)
            .extract(|code| Ok(langs.get(code).cloned()), &mut dedup)
            .unwrap();

        let by_word: HashMap<&str, &str> = chains[0]
            .iter()
            .map(|w| (w.word.as_str(), w.transliteration.as_str()))
            .collect();
        assert_eq!(by_word["мать"], "mat'");
        assert_eq!(by_word["mother"], "");
        assert_eq!(by_word["Mutter"], "");
    }

    #[test]
    fn test_pairs_without_transliteration_give_empty_strings() {
        let chains = extract(&[pair("eng", "mother", "deu", "Mutter")]);
        assert!(chains[0].iter().all(|w| w.transliteration.is_empty()));
    }

    #[test]
    fn test_shared_language_is_jittered_across_chains() {
        let chains = extract(&[
            pair("eng", "a", "deu", "b"),
            pair("eng", "c", "nld", "d"),
            pair("eng", "e", "tur", "f"),
        ]);

        let english: Vec<Vec<f64>> = chains
            .iter()
            .flat_map(|c| c.iter())
            .filter(|w| w.language.code == "eng")
            .map(|w| w.language.coordinates.clone())
            .collect();

        assert_eq!(english, vec![vec![52.0, -1.0], vec![53.0, -1.0], vec![51.0, -1.0]]);
    }
}
