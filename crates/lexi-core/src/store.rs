//! Graph store seam.
//!
//! The traversal services only talk to a store through [`LexicalStore`];
//! the Neo4j adapter and the in-memory fixture store both implement it.

use async_trait::async_trait;

use crate::error::LexiResult;
use crate::model::SearchField;
use crate::raw::{RawGraph, RawNeighbor, RawNode};

/// Node and relationship totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct StoreCounts {
    pub nodes: usize,
    pub relationships: usize,
}

/// Read-only access to a lexical property graph.
///
/// Implementations return raw rows: duplicates, self-references and dangling
/// endpoints are allowed and cleaned up by [`crate::sanitize::sanitize`].
/// Node identifiers are reconciled as the first non-empty of `id`, `kanji`, `name`.
#[async_trait]
pub trait LexicalStore: Send + Sync {
    /// Find the node `term` names under `field`, if any.
    async fn resolve_center(&self, term: &str, field: SearchField) -> LexiResult<Option<RawNode>>;

    /// One traversal hop from every id in `frontier`.
    ///
    /// Returns the neighbor nodes and the connecting relations, at most
    /// `limit` relations per frontier node, strongest first.
    async fn expand_frontier(&self, frontier: &[String], limit: usize) -> LexiResult<RawGraph>;

    /// Fetch one node by identifier.
    async fn fetch_node(&self, id: &str) -> LexiResult<Option<RawNode>>;

    /// Immediate neighbors of `id` with relation properties, in store order.
    async fn fetch_neighbors(&self, id: &str, limit: usize) -> LexiResult<Vec<RawNeighbor>>;

    /// Node and relationship totals for status displays.
    async fn counts(&self) -> LexiResult<StoreCounts>;
}
