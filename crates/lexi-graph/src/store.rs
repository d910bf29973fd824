//! [`LexicalStore`] implementation over Neo4j.

use async_trait::async_trait;
use lexi_core::raw::{RawGraph, RawNeighbor, RawNode};
use lexi_core::{LexiResult, LexicalStore, SearchField, StoreCounts};

use crate::queries::{detail, traverse};
use crate::GraphClient;

#[async_trait]
impl LexicalStore for GraphClient {
    async fn resolve_center(&self, term: &str, field: SearchField) -> LexiResult<Option<RawNode>> {
        traverse::resolve_center(self, term, field).await
    }

    async fn expand_frontier(&self, frontier: &[String], limit: usize) -> LexiResult<RawGraph> {
        traverse::expand_frontier(self, frontier, limit).await
    }

    async fn fetch_node(&self, id: &str) -> LexiResult<Option<RawNode>> {
        detail::fetch_node(self, id).await
    }

    async fn fetch_neighbors(&self, id: &str, limit: usize) -> LexiResult<Vec<RawNeighbor>> {
        detail::fetch_neighbors(self, id, limit).await
    }

    async fn counts(&self) -> LexiResult<StoreCounts> {
        self.get_counts().await
    }
}
