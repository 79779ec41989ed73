//! Cognate Graph - In-memory relationship graph for one concept
//!
//! Built fresh for every chain query from the concept's pair list and
//! dropped once the chains have been extracted.

use std::collections::BTreeMap;
use crate::cognate::{CognatePair, NodeId};

/// Undirected graph of cognate relationships.
///
/// Every pair is stored as two directed entries (`a -> b` and `b -> a`),
/// each mapped to the originating [`CognatePair`]. Adjacency is kept in
/// ordered maps so nodes and neighbors iterate lexicographically.
///
/// When several pairs connect the same two nodes, the last one inserted
/// wins.
#[derive(Debug, Default, Clone)]
pub struct CognateGraph {
    adjacency: BTreeMap<NodeId, BTreeMap<NodeId, CognatePair>>,
}

impl CognateGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a concept's pair list, in input order
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = &'a CognatePair>) -> Self {
        let mut graph = Self::new();
        for pair in pairs {
            graph.add_pair(pair);
        }
        graph
    }

    /// Add a pair as an undirected edge
    pub fn add_pair(&mut self, pair: &CognatePair) {
        let id1 = pair.node1();
        let id2 = pair.node2();

        self.adjacency
            .entry(id1.clone())
            .or_default()
            .insert(id2.clone(), pair.clone());

        self.adjacency
            .entry(id2)
            .or_default()
            .insert(id1, pair.clone());
    }

    /// Neighbors of a node, with the pair that links each of them
    pub fn neighbors(&self, node: &NodeId) -> Option<&BTreeMap<NodeId, CognatePair>> {
        self.adjacency.get(node)
    }

    /// All nodes, in lexicographic order
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.adjacency.keys()
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        let (loops, others) = self.adjacency.iter().fold((0, 0), |(loops, others), (node, n)| {
            if n.contains_key(node) {
                (loops + 1, others + n.len() - 1)
            } else {
                (loops, others + n.len())
            }
        });
        loops + others / 2
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Get statistics about the graph
    pub fn stats(&self) -> GraphStats {
        let languages: std::collections::BTreeSet<&str> =
            self.nodes().map(|n| n.language.as_str()).collect();

        GraphStats {
            nodes: self.node_count(),
            edges: self.edge_count(),
            languages: languages.len(),
        }
    }
}

/// Statistics about a cognate graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub languages: usize,
}

impl std::fmt::Display for GraphStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} words, {} links, {} languages",
            self.nodes, self.edges, self.languages
        )
    }
}
