//! Node detail for the side panel.

use std::collections::HashMap;

use tracing::debug;

use crate::config::ServiceConfig;
use crate::error::{LexiError, LexiResult};
use crate::model::{NeighborInfo, NodeDetailResponse};
use crate::raw::{non_empty, numeric, RawNeighbor};
use crate::sanitize::{coerce_weight, node_from_raw, DEFAULT_RELATION};
use crate::store::LexicalStore;

/// Fetch a node and its immediate neighbors, strongest first.
///
/// Strength is the synonym strength of the relation, falling back to its
/// weight. Ties keep the order the store returned them in. A neighbor reached
/// through several relations is listed once, under the strongest one.
pub async fn node_detail(
    store: &dyn LexicalStore,
    node_id: &str,
    config: &ServiceConfig,
) -> LexiResult<NodeDetailResponse> {
    let node_id = node_id.trim();

    let raw = store
        .fetch_node(node_id)
        .await
        .map_err(lookup_failure)?
        .ok_or_else(|| LexiError::NodeNotFound(node_id.to_string()))?;
    let id = raw.identity().unwrap_or(node_id).to_string();
    let node = node_from_raw(&id, &raw);

    let rows = store
        .fetch_neighbors(&id, config.detail_limit)
        .await
        .map_err(lookup_failure)?;
    let neighbors = rank_neighbors(&id, rows);

    debug!(node = %id, neighbors = neighbors.len(), "Loaded node detail");

    Ok(NodeDetailResponse { node, neighbors })
}

/// A detail lookup has no depth to reduce, so a store timeout is reported as an outage.
fn lookup_failure(err: LexiError) -> LexiError {
    match err {
        LexiError::TraversalTimeout { .. } => LexiError::unavailable("node detail lookup timed out"),
        other => other,
    }
}

fn rank_neighbors(id: &str, rows: Vec<RawNeighbor>) -> Vec<NeighborInfo> {
    let mut neighbors: Vec<NeighborInfo> = Vec::with_capacity(rows.len());
    let mut slots: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let Some(other) = row.node.identity().map(str::to_string) else {
            continue;
        };
        if other == id {
            continue;
        }

        let info = NeighborInfo {
            source: id.to_string(),
            target: other.clone(),
            weight: coerce_weight(row.weight.as_ref()),
            relation_type: non_empty(row.relation_type.as_deref())
                .unwrap_or(DEFAULT_RELATION)
                .to_string(),
            synonym_strength: numeric(row.synonym_strength.as_ref()),
            mutual_sense: non_empty(row.mutual_sense.as_deref()).map(str::to_string),
            node: node_from_raw(&other, &row.node),
        };

        match slots.get(&other) {
            Some(&slot) => {
                if info.strength() > neighbors[slot].strength() {
                    neighbors[slot] = info;
                }
            }
            None => {
                slots.insert(other, neighbors.len());
                neighbors.push(info);
            }
        }
    }

    neighbors.sort_by(|a, b| b.strength().total_cmp(&a.strength()));
    neighbors
}
