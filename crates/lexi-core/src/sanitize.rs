//! Graph sanitization.
//!
//! Turns raw traversal rows into a node/edge set the renderer can consume:
//! unique non-empty node ids, no self-loops, no dangling edges, and at most
//! one edge per node pair. Never fails; malformed rows are dropped.

use std::collections::{HashMap, HashSet};

use crate::model::{GraphData, LexicalEdge, LexicalNode};
use crate::raw::{non_empty, numeric, RawGraph, RawNode};

/// Weight used when a relation carries none (or a non-numeric one).
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Relation type used when a relation carries none.
pub const DEFAULT_RELATION: &str = "related";

/// Sanitize raw rows into a graph.
///
/// First-seen wins for duplicate node ids. Parallel edges between the same
/// unordered pair collapse to the heaviest one, which keeps the slot where
/// the pair was first seen; equal weights keep the first.
pub fn sanitize(raw: &RawGraph) -> GraphData {
    let mut ids: HashSet<String> = HashSet::new();
    let mut nodes = Vec::new();

    for row in &raw.nodes {
        let Some(id) = row.identity() else {
            continue;
        };
        if !ids.insert(id.to_string()) {
            continue;
        }
        nodes.push(node_from_raw(id, row));
    }

    let mut links: Vec<LexicalEdge> = Vec::new();
    let mut slots: HashMap<(String, String), usize> = HashMap::new();

    for edge in &raw.edges {
        let (Some(source), Some(target)) = (
            non_empty(edge.source.as_deref()),
            non_empty(edge.target.as_deref()),
        ) else {
            continue;
        };
        if source == target || !ids.contains(source) || !ids.contains(target) {
            continue;
        }

        let candidate = LexicalEdge {
            source: source.to_string(),
            target: target.to_string(),
            weight: coerce_weight(edge.weight.as_ref()),
            relation_type: non_empty(edge.relation_type.as_deref())
                .unwrap_or(DEFAULT_RELATION)
                .to_string(),
        };

        match slots.get(&pair_key(source, target)) {
            Some(&slot) => {
                if candidate.weight > links[slot].weight {
                    links[slot] = candidate;
                }
            }
            None => {
                slots.insert(pair_key(source, target), links.len());
                links.push(candidate);
            }
        }
    }

    GraphData { nodes, links }
}

/// Coerce a stored weight to a number, defaulting to [`DEFAULT_WEIGHT`].
pub fn coerce_weight(value: Option<&serde_json::Value>) -> f64 {
    numeric(value).unwrap_or(DEFAULT_WEIGHT)
}

/// Build a node snapshot from a raw row whose identity is `id`.
pub(crate) fn node_from_raw(id: &str, row: &RawNode) -> LexicalNode {
    let text = |v: &Option<String>| non_empty(v.as_deref()).map(str::to_string);
    let name = [&row.kanji, &row.name]
        .into_iter()
        .find_map(|v| non_empty(v.as_deref()))
        .unwrap_or(id)
        .to_string();

    LexicalNode {
        id: id.to_string(),
        name,
        kanji: text(&row.kanji),
        reading: text(&row.reading),
        translation: text(&row.translation),
        part_of_speech: text(&row.part_of_speech),
        level: text(&row.level),
        domain: text(&row.domain),
        is_center: row.is_center,
    }
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::RawEdge;
    use proptest::prelude::*;
    use serde_json::json;

    fn node(id: &str) -> RawNode {
        RawNode {
            id: Some(id.to_string()),
            ..Default::default()
        }
    }

    fn edge(source: &str, target: &str, weight: Option<serde_json::Value>) -> RawEdge {
        RawEdge {
            source: Some(source.to_string()),
            target: Some(target.to_string()),
            relation_type: Some("synonym".to_string()),
            weight,
        }
    }

    #[test]
    fn test_self_loop_excluded() {
        let raw = RawGraph {
            nodes: vec![node("猫"), node("犬")],
            edges: vec![edge("猫", "猫", None), edge("猫", "犬", None)],
        };
        let data = sanitize(&raw);
        assert_eq!(data.links.len(), 1);
        assert_eq!(data.links[0].target, "犬");
    }

    #[test]
    fn test_duplicate_nodes_first_seen_wins() {
        let mut first = node("猫");
        first.translation = Some("cat".into());
        let mut second = node(" 猫 ");
        second.translation = Some("kitty".into());

        let data = sanitize(&RawGraph {
            nodes: vec![first, node("犬"), second],
            edges: vec![],
        });
        assert_eq!(data.nodes.len(), 2);
        assert_eq!(data.nodes[0].translation.as_deref(), Some("cat"));
    }

    #[test]
    fn test_blank_ids_skipped() {
        let data = sanitize(&RawGraph {
            nodes: vec![node("   "), RawNode::default(), node("木")],
            edges: vec![edge("", "木", None)],
        });
        assert_eq!(data.nodes.len(), 1);
        assert!(data.links.is_empty());
    }

    #[test]
    fn test_dangling_edges_dropped() {
        let data = sanitize(&RawGraph {
            nodes: vec![node("山"), node("川")],
            edges: vec![edge("山", "海", None), edge("山", "川", None)],
        });
        assert_eq!(data.links.len(), 1);
    }

    #[test]
    fn test_display_name_fallback_order() {
        let with_kanji = RawNode {
            id: Some("taberu".into()),
            kanji: Some("食べる".into()),
            name: Some("eat".into()),
            ..Default::default()
        };
        let with_name = RawNode {
            id: Some("nomu".into()),
            name: Some("飲む".into()),
            ..Default::default()
        };
        let data = sanitize(&RawGraph {
            nodes: vec![with_kanji, with_name, node("みる")],
            edges: vec![],
        });
        let names: Vec<_> = data.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["食べる", "飲む", "みる"]);
    }

    #[test]
    fn test_weight_coercion() {
        let data = sanitize(&RawGraph {
            nodes: vec![node("a"), node("b"), node("c"), node("d")],
            edges: vec![
                edge("a", "b", Some(json!("0.7"))),
                edge("a", "c", Some(json!("very"))),
                edge("a", "d", None),
            ],
        });
        let weights: Vec<f64> = data.links.iter().map(|l| l.weight).collect();
        assert_eq!(weights, vec![0.7, 1.0, 1.0]);
    }

    #[test]
    fn test_parallel_edges_keep_highest() {
        let mut hypernym = edge("b", "a", Some(json!(4)));
        hypernym.relation_type = Some("hypernym".into());
        let data = sanitize(&RawGraph {
            nodes: vec![node("a"), node("b"), node("c")],
            edges: vec![
                edge("a", "b", Some(json!(2))),
                edge("a", "c", Some(json!(1))),
                hypernym,
                edge("a", "b", Some(json!(4))),
            ],
        });
        assert_eq!(data.links.len(), 2);
        assert_eq!(data.links[0].relation_type, "hypernym");
        assert_eq!(data.links[0].weight, 4.0);
        assert_eq!(data.links[1].target, "c");
    }

    #[test]
    fn test_missing_relation_type_defaults() {
        let data = sanitize(&RawGraph {
            nodes: vec![node("a"), node("b")],
            edges: vec![RawEdge {
                source: Some("a".into()),
                target: Some("b".into()),
                ..Default::default()
            }],
        });
        assert_eq!(data.links[0].relation_type, DEFAULT_RELATION);
        assert_eq!(data.links[0].weight, DEFAULT_WEIGHT);
    }

    #[test]
    fn test_malformed_input_degrades_to_empty() {
        let data = sanitize(&RawGraph {
            nodes: vec![RawNode::default(); 3],
            edges: vec![RawEdge::default(); 3],
        });
        assert_eq!(data, GraphData::default());
    }

    fn arb_id() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            Just(Some(String::new())),
            Just(Some("  ".to_string())),
            prop::sample::select(vec!["猫", "犬", "鳥", " 猫", "魚 ", "木"])
                .prop_map(|s| Some(s.to_string())),
        ]
    }

    fn arb_weight() -> impl Strategy<Value = Option<serde_json::Value>> {
        prop_oneof![
            Just(None),
            (0u32..10).prop_map(|n| Some(json!(n))),
            Just(Some(json!("2.5"))),
            Just(Some(json!("x"))),
        ]
    }

    prop_compose! {
        fn arb_raw()(
            nodes in prop::collection::vec(arb_id(), 0..8),
            edges in prop::collection::vec((arb_id(), arb_id(), arb_weight()), 0..16),
        ) -> RawGraph {
            RawGraph {
                nodes: nodes.into_iter().map(|id| RawNode { id, ..Default::default() }).collect(),
                edges: edges
                    .into_iter()
                    .map(|(source, target, weight)| RawEdge { source, target, weight, relation_type: None })
                    .collect(),
            }
        }
    }

    proptest! {
        #[test]
        fn prop_sanitize_is_idempotent(raw in arb_raw()) {
            let once = sanitize(&raw);
            let twice = sanitize(&RawGraph::from(&once));
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_no_self_loops_or_dangling_edges(raw in arb_raw()) {
            let data = sanitize(&raw);
            prop_assert!(data.links.len() <= raw.edges.len());
            for link in &data.links {
                prop_assert_ne!(&link.source, &link.target);
                prop_assert!(data.nodes.iter().any(|n| n.id == link.source));
                prop_assert!(data.nodes.iter().any(|n| n.id == link.target));
            }
        }

        #[test]
        fn prop_node_count_equals_distinct_ids(raw in arb_raw()) {
            let distinct: HashSet<&str> = raw.nodes.iter().filter_map(|n| n.identity()).collect();
            let data = sanitize(&raw);
            prop_assert_eq!(data.nodes.len(), distinct.len());
        }
    }
}
