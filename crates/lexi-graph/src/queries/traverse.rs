//! Center resolution and frontier expansion.

use lexi_core::raw::{RawEdge, RawGraph, RawNode};
use lexi_core::{LexiResult, SearchField};
use neo4rs::Query;

use super::{node_identity, node_projection, parse_node, scalar, text};
use crate::GraphClient;

/// WHERE clause matching `$term` against `field` of node `n`.
fn match_condition(field: SearchField) -> String {
    match field {
        SearchField::Kanji => format!("n.kanji = $term OR {} = $term", node_identity("n")),
        SearchField::Hiragana => "coalesce(n.hiragana, n.reading) = $term".to_string(),
        SearchField::Translation => "toLower(n.translation) = toLower($term)".to_string(),
    }
}

pub(crate) fn resolve_cypher(label: &str, field: SearchField) -> String {
    format!(
        "MATCH (n:{label})
         WHERE {cond}
         RETURN {proj}
         LIMIT 1",
        label = label,
        cond = match_condition(field),
        proj = node_projection("n", ""),
    )
}

pub(crate) fn frontier_cypher(label: &str) -> String {
    format!(
        "UNWIND $ids AS cid
         MATCH (c:{label})
         WHERE {cid} = cid
         CALL {{
             WITH c
             MATCH (c)-[r]-(m:{label})
             RETURN r, m
             ORDER BY coalesce(r.synonym_strength, r.weight, 1) DESC
             LIMIT $limit
         }}
         RETURN {src} AS source, {dst} AS target, type(r) AS relationType,
                coalesce(r.synonym_strength, r.weight) AS weight,
                {proj}",
        label = label,
        cid = node_identity("c"),
        src = node_identity("startNode(r)"),
        dst = node_identity("endNode(r)"),
        proj = node_projection("m", "n_"),
    )
}

/// Find the node `term` names under `field`.
pub async fn resolve_center(
    client: &GraphClient,
    term: &str,
    field: SearchField,
) -> LexiResult<Option<RawNode>> {
    let query = Query::new(resolve_cypher(client.label(), field)).param("term", term.trim());

    let rows = client.query(query).await?;
    Ok(rows.first().map(|row| parse_node(row, "")))
}

/// One hop from every id of `frontier`, at most `limit` relations each.
pub async fn expand_frontier(
    client: &GraphClient,
    frontier: &[String],
    limit: usize,
) -> LexiResult<RawGraph> {
    if frontier.is_empty() {
        return Ok(RawGraph::default());
    }

    let query = Query::new(frontier_cypher(client.label()))
        .param("ids", frontier.to_vec())
        .param("limit", limit as i64);

    let rows = client.query(query).await?;
    let mut graph = RawGraph::default();
    for row in &rows {
        graph.nodes.push(parse_node(row, "n_"));
        graph.edges.push(RawEdge {
            source: text(row, "source"),
            target: text(row, "target"),
            relation_type: text(row, "relationType"),
            weight: scalar(row, "weight"),
        });
    }

    Ok(graph)
}
