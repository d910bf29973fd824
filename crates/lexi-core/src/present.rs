//! Render hints for the force-directed viewer.
//!
//! Colors, labels and sizes are derived from a [`GraphResponse`] under a
//! [`ColorScheme`]. The output is a fresh snapshot; the renderer's own
//! simulation state is never touched here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LexiError;
use crate::model::{GraphResponse, LexicalNode};

/// Color of the center node under every scheme.
pub const CENTER_COLOR: &str = "#e91e63";

/// Color of nodes with no value for the active scheme.
pub const UNKNOWN_COLOR: &str = "#9e9e9e";

/// Colors for JLPT bands, easiest first (N5 .. N1).
const LEVEL_COLORS: [&str; 5] = ["#4caf50", "#8bc34a", "#ffc107", "#ff9800", "#f44336"];

const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
    "#8c564b", "#17becf", "#bcbd22", "#7f7f7f", "#393b79",
];

const CENTER_SIZE: f64 = 8.0;
const NODE_SIZE: f64 = 4.0;
const MIN_LINK_WIDTH: f64 = 1.0;
const MAX_LINK_WIDTH: f64 = 5.0;

/// Which node attribute drives node colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorScheme {
    #[default]
    Level,
    PartOfSpeech,
    Domain,
}

impl ColorScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Level => "level",
            Self::PartOfSpeech => "partOfSpeech",
            Self::Domain => "domain",
        }
    }

    fn category<'a>(&self, node: &'a LexicalNode) -> Option<&'a str> {
        match self {
            Self::Level => node.level.as_deref(),
            Self::PartOfSpeech => node.part_of_speech.as_deref(),
            Self::Domain => node.domain.as_deref(),
        }
    }

    /// Color for a category value under this scheme.
    pub fn color_for(&self, category: Option<&str>) -> &'static str {
        let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) else {
            return UNKNOWN_COLOR;
        };
        if *self == Self::Level {
            if let Some(band) = jlpt_band(category) {
                return LEVEL_COLORS[5 - band as usize];
            }
        }
        PALETTE[stable_hash(category) as usize % PALETTE.len()]
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorScheme {
    type Err = LexiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "level" => Ok(Self::Level),
            "partOfSpeech" | "pos" | "part_of_speech" => Ok(Self::PartOfSpeech),
            "domain" => Ok(Self::Domain),
            other => Err(LexiError::InvalidColorScheme(other.to_string())),
        }
    }
}

/// Band number 1..=5 for "N3", "n3" or "3".
fn jlpt_band(level: &str) -> Option<u8> {
    let digits = level.strip_prefix(['N', 'n']).unwrap_or(level);
    digits.parse::<u8>().ok().filter(|b| (1..=5).contains(b))
}

/// FNV-1a, stable across runs and platforms.
fn stable_hash(s: &str) -> u32 {
    s.bytes()
        .fold(0x811c_9dc5u32, |h, b| (h ^ b as u32).wrapping_mul(0x0100_0193))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: String,
    pub label: String,
    pub color: &'static str,
    pub val: f64,
    pub group: Option<String>,
    pub is_center: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderLink {
    pub source: String,
    pub target: String,
    pub weight: f64,
    pub width: f64,
    pub relation_type: String,
}

/// A decorated graph, ready for `force-graph` / `3d-force-graph`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderGraph {
    pub scheme: ColorScheme,
    pub center: Option<String>,
    pub nodes: Vec<RenderNode>,
    pub links: Vec<RenderLink>,
}

/// Node label: display name, with the reading when it adds information.
pub fn label_for(node: &LexicalNode) -> String {
    match node.reading.as_deref() {
        Some(reading) if reading != node.name => format!("{} ({})", node.name, reading),
        _ => node.name.clone(),
    }
}

/// Decorate a graph response for rendering.
pub fn decorate(graph: &GraphResponse, scheme: ColorScheme) -> RenderGraph {
    let nodes = graph
        .nodes
        .iter()
        .map(|node| {
            let group = scheme.category(node).map(str::to_string);
            RenderNode {
                id: node.id.clone(),
                label: label_for(node),
                color: if node.is_center {
                    CENTER_COLOR
                } else {
                    scheme.color_for(group.as_deref())
                },
                val: if node.is_center { CENTER_SIZE } else { NODE_SIZE },
                group,
                is_center: node.is_center,
            }
        })
        .collect();

    let heaviest = graph.links.iter().map(|l| l.weight).fold(0.0_f64, f64::max);
    let links = graph
        .links
        .iter()
        .map(|link| RenderLink {
            source: link.source.clone(),
            target: link.target.clone(),
            weight: link.weight,
            width: link_width(link.weight, heaviest),
            relation_type: link.relation_type.clone(),
        })
        .collect();

    RenderGraph {
        scheme,
        center: graph.center_id().map(str::to_string),
        nodes,
        links,
    }
}

fn link_width(weight: f64, heaviest: f64) -> f64 {
    if weight <= 0.0 || heaviest <= 0.0 {
        return MIN_LINK_WIDTH;
    }
    MIN_LINK_WIDTH + (MAX_LINK_WIDTH - MIN_LINK_WIDTH) * (weight / heaviest)
}
