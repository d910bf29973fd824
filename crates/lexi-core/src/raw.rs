//! Raw rows as returned by a graph store, before sanitization.
//!
//! Rows may repeat nodes across query branches, reference nodes that were not
//! returned, or point back at themselves. Nothing here is validated.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{GraphData, LexicalEdge, LexicalNode};

/// Node property map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawNode {
    pub id: Option<String>,
    pub kanji: Option<String>,
    pub name: Option<String>,
    #[serde(alias = "hiragana")]
    pub reading: Option<String>,
    pub translation: Option<String>,
    pub part_of_speech: Option<String>,
    pub level: Option<String>,
    pub domain: Option<String>,
    pub is_center: bool,
}

impl RawNode {
    /// Identifier reconciled across property keys: first non-empty of id, kanji, name.
    pub fn identity(&self) -> Option<&str> {
        [&self.id, &self.kanji, &self.name]
            .into_iter()
            .find_map(|v| non_empty(v.as_deref()))
    }
}

/// Relationship property map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEdge {
    pub source: Option<String>,
    pub target: Option<String>,
    pub relation_type: Option<String>,
    /// Any JSON value; coerced to a number during sanitization.
    pub weight: Option<Value>,
}

/// A neighbor row for the node detail query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawNeighbor {
    pub node: RawNode,
    pub relation_type: Option<String>,
    pub weight: Option<Value>,
    pub synonym_strength: Option<Value>,
    pub mutual_sense: Option<String>,
}

/// Accumulated raw rows of one or more traversal hops.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawGraph {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
}

impl RawGraph {
    /// Append another hop's rows, keeping order.
    pub fn extend(&mut self, other: RawGraph) {
        self.nodes.extend(other.nodes);
        self.edges.extend(other.edges);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

impl From<&LexicalNode> for RawNode {
    fn from(node: &LexicalNode) -> Self {
        Self {
            id: Some(node.id.clone()),
            kanji: node.kanji.clone(),
            name: Some(node.name.clone()),
            reading: node.reading.clone(),
            translation: node.translation.clone(),
            part_of_speech: node.part_of_speech.clone(),
            level: node.level.clone(),
            domain: node.domain.clone(),
            is_center: node.is_center,
        }
    }
}

impl From<&LexicalEdge> for RawEdge {
    fn from(edge: &LexicalEdge) -> Self {
        Self {
            source: Some(edge.source.clone()),
            target: Some(edge.target.clone()),
            relation_type: Some(edge.relation_type.clone()),
            weight: serde_json::Number::from_f64(edge.weight).map(Value::Number),
        }
    }
}

impl From<&GraphData> for RawGraph {
    fn from(data: &GraphData) -> Self {
        Self {
            nodes: data.nodes.iter().map(RawNode::from).collect(),
            edges: data.links.iter().map(RawEdge::from).collect(),
        }
    }
}

/// Trimmed value, or `None` when blank.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Interpret a stored value as a finite number.
///
/// Numbers are taken as-is and numeric strings are parsed; anything else is `None`.
pub fn numeric(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}
