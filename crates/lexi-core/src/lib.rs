//! # Lexigraph Core
//!
//! Lexical graph model and traversal logic: sanitization of raw store rows,
//! neighbor expansion around a center word, node detail, render hints and
//! the viewer state machine. Storage is reached only through [`LexicalStore`].

pub mod config;
pub mod detail;
pub mod error;
pub mod expand;
pub mod memory;
pub mod model;
pub mod present;
pub mod raw;
pub mod sanitize;
pub mod store;
pub mod view;

pub use config::ServiceConfig;
pub use detail::node_detail;
pub use error::{LexiError, LexiResult};
pub use expand::{expand_neighbors, ExpansionRequest};
pub use memory::MemoryStore;
pub use model::{
    Depth, GraphData, GraphOutcome, GraphResponse, LexicalEdge, LexicalNode, NeighborInfo,
    NodeDetailResponse, SearchField,
};
pub use present::{decorate, ColorScheme, RenderGraph};
pub use sanitize::sanitize;
pub use store::{LexicalStore, StoreCounts};
