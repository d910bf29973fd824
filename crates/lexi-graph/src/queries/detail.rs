//! Single-node lookups for the detail panel.

use lexi_core::raw::{RawNeighbor, RawNode};
use lexi_core::LexiResult;
use neo4rs::Query;

use super::{node_identity, node_projection, parse_node, scalar, text};
use crate::GraphClient;

pub(crate) fn node_cypher(label: &str) -> String {
    format!(
        "MATCH (n:{label})
         WHERE {id} = $id
         RETURN {proj}
         LIMIT 1",
        label = label,
        id = node_identity("n"),
        proj = node_projection("n", ""),
    )
}

pub(crate) fn neighbors_cypher(label: &str) -> String {
    format!(
        "MATCH (n:{label})
         WHERE {id} = $id
         MATCH (n)-[r]-(m:{label})
         WHERE m <> n
         RETURN {proj}, type(r) AS relationType, r.weight AS weight,
                r.synonym_strength AS synonymStrength, r.mutual_sense AS mutualSense
         ORDER BY coalesce(toFloatOrNull(r.synonym_strength), toFloatOrNull(r.weight), 1.0) DESC
         LIMIT $limit",
        label = label,
        id = node_identity("n"),
        proj = node_projection("m", "n_"),
    )
}

/// Fetch one node by its reconciled identifier.
pub async fn fetch_node(client: &GraphClient, id: &str) -> LexiResult<Option<RawNode>> {
    let query = Query::new(node_cypher(client.label())).param("id", id.trim());
    let rows = client.query(query).await?;
    Ok(rows.first().map(|row| parse_node(row, "")))
}

/// Immediate neighbors of `id` with their relation properties.
pub async fn fetch_neighbors(
    client: &GraphClient,
    id: &str,
    limit: usize,
) -> LexiResult<Vec<RawNeighbor>> {
    let query = Query::new(neighbors_cypher(client.label()))
        .param("id", id.trim())
        .param("limit", limit as i64);

    let rows = client.query(query).await?;
    Ok(rows
        .iter()
        .map(|row| RawNeighbor {
            node: parse_node(row, "n_"),
            relation_type: text(row, "relationType"),
            weight: scalar(row, "weight"),
            synonym_strength: scalar(row, "synonymStrength"),
            mutual_sense: text(row, "mutualSense"),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_query_uses_reconciled_identity() {
        let cypher = node_cypher("Word");
        assert!(cypher.contains("WHERE coalesce(n.id, n.kanji, n.name) = $id"));
    }

    #[test]
    fn test_neighbors_query_returns_relation_properties() {
        let cypher = neighbors_cypher("Lexeme");
        assert!(cypher.contains("MATCH (n)-[r]-(m:Lexeme)"));
        assert!(cypher.contains("r.synonym_strength AS synonymStrength"));
        assert!(cypher.contains("r.mutual_sense AS mutualSense"));
        assert!(cypher.contains("LIMIT $limit"));
    }

    #[test]
    fn test_neighbors_query_ranks_before_limit() {
        let cypher = neighbors_cypher("Word");
        assert!(cypher.contains("WHERE m <> n"));
        let order = cypher
            .find("ORDER BY coalesce(toFloatOrNull(r.synonym_strength), toFloatOrNull(r.weight), 1.0) DESC")
            .unwrap();
        let limit = cypher.find("LIMIT $limit").unwrap();
        assert!(order < limit);
    }
}
