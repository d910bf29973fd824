//! Cypher queries and row parsing.
//!
//! Node identity is reconciled in Cypher as `coalesce(id, kanji, name)` so
//! every node and edge endpoint carries the same identifier.

pub mod detail;
pub mod traverse;

use neo4rs::Row;
use serde_json::Value;

use lexi_core::raw::RawNode;

/// Identifier expression for node variable `var`.
pub(crate) fn node_identity(var: &str) -> String {
    format!("coalesce({v}.id, {v}.kanji, {v}.name)", v = var)
}

/// RETURN projection of node variable `var`, columns prefixed with `prefix`.
pub(crate) fn node_projection(var: &str, prefix: &str) -> String {
    format!(
        "{id} AS {p}id, {v}.kanji AS {p}kanji, {v}.name AS {p}name, \
         coalesce({v}.hiragana, {v}.reading) AS {p}reading, \
         {v}.translation AS {p}translation, \
         coalesce({v}.partOfSpeech, {v}.part_of_speech, {v}.pos) AS {p}partOfSpeech, \
         {v}.level AS {p}level, {v}.domain AS {p}domain",
        id = node_identity(var),
        v = var,
        p = prefix,
    )
}

/// Read a column as text; integers and floats are rendered as strings.
pub(crate) fn text(row: &Row, key: &str) -> Option<String> {
    row.get::<String>(key)
        .ok()
        .or_else(|| row.get::<i64>(key).ok().map(|n| n.to_string()))
        .or_else(|| row.get::<f64>(key).ok().map(|n| n.to_string()))
}

/// Read a column as a raw JSON scalar (number or string), for later coercion.
pub(crate) fn scalar(row: &Row, key: &str) -> Option<Value> {
    if let Ok(n) = row.get::<i64>(key) {
        return Some(Value::from(n));
    }
    if let Ok(n) = row.get::<f64>(key) {
        return serde_json::Number::from_f64(n).map(Value::Number);
    }
    row.get::<String>(key).ok().map(Value::String)
}

/// Parse a node projected with [`node_projection`].
pub(crate) fn parse_node(row: &Row, prefix: &str) -> RawNode {
    let col = |name: &str| text(row, &format!("{}{}", prefix, name));
    RawNode {
        id: col("id"),
        kanji: col("kanji"),
        name: col("name"),
        reading: col("reading"),
        translation: col("translation"),
        part_of_speech: col("partOfSpeech"),
        level: col("level"),
        domain: col("domain"),
        is_center: false,
    }
}
