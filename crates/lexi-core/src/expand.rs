//! Neighbor expansion around a center word.
//!
//! One hop for depth 1; for depth 2 a second hop from every depth-1 neighbor.
//! All hops feed one raw accumulator that is sanitized once at the end, so
//! first-seen-wins holds across the whole expansion.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::config::ServiceConfig;
use crate::error::{LexiError, LexiResult};
use crate::model::{Depth, GraphResponse, SearchField};
use crate::raw::RawGraph;
use crate::sanitize::sanitize;
use crate::store::LexicalStore;

/// A graph request from the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionRequest {
    pub center: String,
    pub depth: Depth,
    pub field: SearchField,
}

impl ExpansionRequest {
    pub fn new(center: impl Into<String>, depth: Depth, field: SearchField) -> Self {
        Self {
            center: center.into(),
            depth,
            field,
        }
    }
}

/// Expand the neighborhood of `request.center`.
///
/// An empty center returns [`GraphResponse::empty_input`] without touching the
/// store; an unknown one returns [`GraphResponse::no_match`]. Links come back
/// ordered by descending weight.
pub async fn expand_neighbors(
    store: &dyn LexicalStore,
    request: &ExpansionRequest,
    config: &ServiceConfig,
) -> LexiResult<GraphResponse> {
    let term = request.center.trim();
    if term.is_empty() {
        debug!("Empty center, nothing to expand");
        return Ok(GraphResponse::empty_input());
    }

    let depth = request.depth;
    let resolved = store
        .resolve_center(term, request.field)
        .await
        .map_err(|e| at_depth(e, depth))?;

    let Some(mut center) = resolved else {
        info!(term, field = %request.field, "No node matches center term");
        return Ok(GraphResponse::no_match());
    };
    let Some(center_id) = center.identity().map(str::to_string) else {
        warn!(term, "Matched node has no usable identifier");
        return Ok(GraphResponse::no_match());
    };
    center.id = Some(center_id.clone());
    center.is_center = true;

    let mut acc = RawGraph {
        nodes: vec![center],
        edges: Vec::new(),
    };

    let first_hop = store
        .expand_frontier(std::slice::from_ref(&center_id), config.neighbor_limit)
        .await
        .map_err(|e| at_depth(e, depth))?;
    let frontier = frontier_of(&first_hop, &center_id);
    acc.extend(first_hop);

    if depth == Depth::Two && !frontier.is_empty() {
        let second_hop = store
            .expand_frontier(&frontier, config.neighbor_limit)
            .await
            .map_err(|e| at_depth(e, depth))?;
        acc.extend(second_hop);
    }

    // Only the origin may carry the center flag, whatever the store reported.
    for node in acc.nodes.iter_mut().skip(1) {
        node.is_center = false;
    }

    let mut data = sanitize(&acc);
    data.links.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    info!(
        center = %center_id,
        depth = depth.hops(),
        nodes = data.nodes.len(),
        links = data.links.len(),
        "Expanded neighborhood"
    );

    Ok(GraphResponse::found(data, center_id))
}

/// Distinct neighbor ids of a hop, in first-seen order, excluding the center.
fn frontier_of(hop: &RawGraph, center_id: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    hop.nodes
        .iter()
        .filter_map(|n| n.identity())
        .filter(|id| *id != center_id)
        .filter(|id| seen.insert(id.to_string()))
        .map(str::to_string)
        .collect()
}

/// Report timeouts against the depth the caller asked for.
fn at_depth(err: LexiError, depth: Depth) -> LexiError {
    match err {
        LexiError::TraversalTimeout { .. } => LexiError::TraversalTimeout { depth: depth.hops() },
        other => other,
    }
}
