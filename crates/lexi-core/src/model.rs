//! Lexical graph model types.
//!
//! Everything here is an immutable snapshot: responses are built fresh per
//! request and handed to the renderer, which owns its own simulation state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LexiError;

/// One lexical unit (word or morpheme).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexicalNode {
    pub id: String,
    /// Canonical display name: first non-empty of kanji, name, id.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub kanji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub translation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub part_of_speech: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub is_center: bool,
}

/// A weighted relation between two nodes of the same response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexicalEdge {
    pub source: String,
    pub target: String,
    pub weight: f64,
    pub relation_type: String,
}

/// Sanitized node/edge set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<LexicalNode>,
    pub links: Vec<LexicalEdge>,
}

/// Reference to the resolved center. `id` is `None` when the term matched nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CenterRef {
    pub id: Option<String>,
}

/// Unit returned to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphResponse {
    pub nodes: Vec<LexicalNode>,
    pub links: Vec<LexicalEdge>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub center: Option<CenterRef>,
}

/// How a graph request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphOutcome {
    /// Nothing was asked for yet.
    EmptyInput,
    /// The term resolved to no node.
    NoMatch,
    /// The term resolved to `center`.
    Found { center: String },
}

impl GraphResponse {
    /// Response for an empty or whitespace-only center.
    pub fn empty_input() -> Self {
        Self::default()
    }

    /// Response for a term that matched no node.
    pub fn no_match() -> Self {
        Self {
            center: Some(CenterRef { id: None }),
            ..Self::default()
        }
    }

    /// Response around a resolved center.
    pub fn found(data: GraphData, center_id: impl Into<String>) -> Self {
        Self {
            nodes: data.nodes,
            links: data.links,
            center: Some(CenterRef {
                id: Some(center_id.into()),
            }),
        }
    }

    pub fn outcome(&self) -> GraphOutcome {
        match &self.center {
            None => GraphOutcome::EmptyInput,
            Some(CenterRef { id: None }) => GraphOutcome::NoMatch,
            Some(CenterRef { id: Some(id) }) => GraphOutcome::Found { center: id.clone() },
        }
    }

    /// The resolved center id, if any.
    pub fn center_id(&self) -> Option<&str> {
        self.center.as_ref().and_then(|c| c.id.as_deref())
    }

    pub fn node(&self, id: &str) -> Option<&LexicalNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// A neighbor entry of the node detail side panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborInfo {
    pub source: String,
    pub target: String,
    pub weight: f64,
    pub relation_type: String,
    pub synonym_strength: Option<f64>,
    pub mutual_sense: Option<String>,
    pub node: LexicalNode,
}

impl NeighborInfo {
    /// Strength used for ordering: synonym strength, falling back to weight.
    pub fn strength(&self) -> f64 {
        self.synonym_strength.unwrap_or(self.weight)
    }
}

/// Full attributes of one node plus its weighted neighbors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDetailResponse {
    pub node: LexicalNode,
    pub neighbors: Vec<NeighborInfo>,
}

/// Node property a center term is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    /// Canonical orthographic form.
    #[default]
    Kanji,
    /// Phonetic form.
    #[serde(alias = "reading")]
    Hiragana,
    /// English gloss, compared case-insensitively.
    Translation,
}

impl SearchField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kanji => "kanji",
            Self::Hiragana => "hiragana",
            Self::Translation => "translation",
        }
    }

    pub fn all() -> &'static [SearchField] {
        &[Self::Kanji, Self::Hiragana, Self::Translation]
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchField {
    type Err = LexiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "kanji" => Ok(Self::Kanji),
            "hiragana" | "reading" => Ok(Self::Hiragana),
            "translation" => Ok(Self::Translation),
            other => Err(LexiError::InvalidSearchField(other.to_string())),
        }
    }
}

/// Number of traversal hops from the center.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub enum Depth {
    #[default]
    One,
    Two,
}

impl Depth {
    pub fn hops(&self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl TryFrom<i64> for Depth {
    type Error = LexiError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(LexiError::InvalidDepth(other.to_string())),
        }
    }
}

impl FromStr for Depth {
    type Err = LexiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<i64>() {
            Ok(n) => Self::try_from(n),
            Err(_) => Err(LexiError::InvalidDepth(s.trim().to_string())),
        }
    }
}

impl From<Depth> for u8 {
    fn from(depth: Depth) -> Self {
        depth.hops()
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hops())
    }
}
