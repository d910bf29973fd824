//! # Lexigraph Graph
//!
//! Neo4j adapter for the lexical graph.
//!
//! Implements [`lexi_core::LexicalStore`] over a bolt connection pool:
//! parameterized Cypher traversals, schema bootstrap, and classification of
//! driver failures into timeouts and outages.

pub mod client;
pub mod error;
pub mod queries;
pub mod schema;
pub mod store;

pub use client::{GraphClient, GraphConfig};
