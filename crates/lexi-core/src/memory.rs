//! In-memory graph store backed by a JSON fixture.
//!
//! Used for offline serving (`lexi serve --fixture`) and in tests. Holds an
//! immutable snapshot, so it needs no locking.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::LexiResult;
use crate::model::SearchField;
use crate::raw::{non_empty, numeric, RawEdge, RawGraph, RawNeighbor, RawNode};
use crate::sanitize::DEFAULT_WEIGHT;
use crate::store::{LexicalStore, StoreCounts};

/// A stored relation, as written in a fixture file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FixtureEdge {
    pub source: String,
    pub target: String,
    pub relation_type: Option<String>,
    pub weight: Option<Value>,
    pub synonym_strength: Option<Value>,
    pub mutual_sense: Option<String>,
}

impl FixtureEdge {
    /// Relation strength as the Neo4j adapter reports it: synonym strength, else weight.
    fn reported_weight(&self) -> Option<Value> {
        self.synonym_strength.clone().or_else(|| self.weight.clone())
    }

    fn touches(&self, id: &str) -> bool {
        self.source.trim() == id || self.target.trim() == id
    }

    fn other_end(&self, id: &str) -> &str {
        if self.source.trim() == id {
            self.target.trim()
        } else {
            self.source.trim()
        }
    }
}

/// Fixture file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<FixtureEdge>,
}

/// Read-only graph store over a fixture snapshot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    nodes: Vec<RawNode>,
    edges: Vec<FixtureEdge>,
    by_id: HashMap<String, usize>,
}

impl MemoryStore {
    pub fn new(fixture: Fixture) -> Self {
        let mut nodes = Vec::with_capacity(fixture.nodes.len());
        let mut by_id = HashMap::new();

        for mut node in fixture.nodes {
            if let Some(id) = node.identity().map(str::to_string) {
                by_id.entry(id.clone()).or_insert(nodes.len());
                node.id = Some(id);
            }
            nodes.push(node);
        }

        Self {
            nodes,
            edges: fixture.edges,
            by_id,
        }
    }

    /// Parse a fixture from JSON text.
    pub fn from_json(json: &str) -> LexiResult<Self> {
        let fixture: Fixture = serde_json::from_str(json)?;
        Ok(Self::new(fixture))
    }

    /// Load a fixture file.
    pub fn load(path: &Path) -> LexiResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let store = Self::from_json(&json)?;
        debug!(
            path = %path.display(),
            nodes = store.nodes.len(),
            edges = store.edges.len(),
            "Loaded graph fixture"
        );
        Ok(store)
    }

    fn node(&self, id: &str) -> Option<&RawNode> {
        self.by_id.get(id).map(|&i| &self.nodes[i])
    }

    fn incident<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a FixtureEdge> + 'a {
        self.edges.iter().filter(move |e| e.touches(id))
    }
}

fn matches_field(node: &RawNode, term: &str, field: SearchField) -> bool {
    let value = |v: &Option<String>| non_empty(v.as_deref()).map(str::to_string);
    match field {
        SearchField::Kanji => {
            value(&node.kanji).as_deref() == Some(term) || node.identity() == Some(term)
        }
        SearchField::Hiragana => value(&node.reading).as_deref() == Some(term),
        SearchField::Translation => value(&node.translation)
            .map(|t| t.to_lowercase() == term.to_lowercase())
            .unwrap_or(false),
    }
}

#[async_trait]
impl LexicalStore for MemoryStore {
    async fn resolve_center(&self, term: &str, field: SearchField) -> LexiResult<Option<RawNode>> {
        let term = term.trim();
        Ok(self
            .nodes
            .iter()
            .find(|n| matches_field(n, term, field))
            .cloned())
    }

    async fn expand_frontier(&self, frontier: &[String], limit: usize) -> LexiResult<RawGraph> {
        let mut graph = RawGraph::default();

        for id in frontier {
            let id = id.trim();
            let mut edges: Vec<&FixtureEdge> = self.incident(id).collect();
            let strength = |e: &FixtureEdge| numeric(e.reported_weight().as_ref()).unwrap_or(DEFAULT_WEIGHT);
            edges.sort_by(|a, b| strength(*b).total_cmp(&strength(*a)));

            for edge in edges.into_iter().take(limit) {
                if let Some(neighbor) = self.node(edge.other_end(id)) {
                    graph.nodes.push(neighbor.clone());
                }
                graph.edges.push(RawEdge {
                    source: Some(edge.source.clone()),
                    target: Some(edge.target.clone()),
                    relation_type: edge.relation_type.clone(),
                    weight: edge.reported_weight(),
                });
            }
        }

        Ok(graph)
    }

    async fn fetch_node(&self, id: &str) -> LexiResult<Option<RawNode>> {
        Ok(self.node(id.trim()).cloned())
    }

    async fn fetch_neighbors(&self, id: &str, limit: usize) -> LexiResult<Vec<RawNeighbor>> {
        let id = id.trim();
        let mut edges: Vec<&FixtureEdge> = self
            .incident(id)
            .filter(|edge| edge.other_end(id) != id)
            .collect();
        // Stable, so equal strengths keep fixture order.
        let strength = |e: &FixtureEdge| numeric(e.reported_weight().as_ref()).unwrap_or(DEFAULT_WEIGHT);
        edges.sort_by(|a, b| strength(*b).total_cmp(&strength(*a)));

        let neighbors = edges
            .into_iter()
            .filter_map(|edge| {
                self.node(edge.other_end(id)).map(|node| RawNeighbor {
                    node: node.clone(),
                    relation_type: edge.relation_type.clone(),
                    weight: edge.weight.clone(),
                    synonym_strength: edge.synonym_strength.clone(),
                    mutual_sense: edge.mutual_sense.clone(),
                })
            })
            .take(limit)
            .collect();
        Ok(neighbors)
    }

    async fn counts(&self) -> LexiResult<StoreCounts> {
        Ok(StoreCounts {
            nodes: self.by_id.len(),
            relationships: self.edges.len(),
        })
    }
}
