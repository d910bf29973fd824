//! Traversal limits.

use serde::Deserialize;

/// Limits applied by the traversal services.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Relations fetched per frontier node and hop.
    pub neighbor_limit: usize,
    /// Neighbors listed in a node detail response.
    pub detail_limit: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            neighbor_limit: 200,
            detail_limit: 100,
        }
    }
}
