//! Neo4j connection client.

use std::time::Duration;

use anyhow::{Context, Result};
use lexi_core::{LexiError, LexiResult, StoreCounts};
use neo4rs::{ConfigBuilder, Graph, Query, Row};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::classify_driver_error;

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Node label of lexical units.
    pub label: String,
    pub max_connections: usize,
    pub fetch_size: usize,
    /// Upper bound for a single query, in milliseconds.
    pub query_timeout_ms: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "lexigraph_dev".to_string(),
            database: "neo4j".to_string(),
            label: "Word".to_string(),
            max_connections: 16,
            fetch_size: 200,
            query_timeout_ms: 8_000,
        }
    }
}

impl GraphConfig {
    /// Reject settings the driver would accept but never work with.
    pub fn validate(&self) -> LexiResult<()> {
        if self.uri.trim().is_empty() {
            return Err(LexiError::config("graph.uri is empty"));
        }
        if self.query_timeout_ms == 0 {
            return Err(LexiError::config("graph.query_timeout_ms must be positive"));
        }
        if self.max_connections == 0 {
            return Err(LexiError::config("graph.max_connections must be positive"));
        }
        Ok(())
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    /// Label restricted to alphanumerics and underscores, safe to splice into Cypher.
    pub fn safe_label(&self) -> String {
        let safe: String = self
            .label
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if safe.is_empty() {
            GraphConfig::default().label
        } else {
            safe
        }
    }
}

/// Client for lexical graph queries.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
    label: String,
    timeout: Duration,
}

impl GraphClient {
    /// Create a new GraphClient from config.
    ///
    /// `Graph::connect` only builds the pool; the `RETURN 1` ping forces a
    /// real bolt handshake so an unreachable server fails here, not on the
    /// first request.
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        config.validate()?;

        let neo4j_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.as_str())
            .max_connections(config.max_connections)
            .fetch_size(config.fetch_size)
            .build()
            .context("Failed to build Neo4j config")?;

        let graph = Graph::connect(neo4j_config)
            .await
            .context("Failed to create Neo4j connection pool")?;

        let client = Self {
            graph,
            label: config.safe_label(),
            timeout: config.query_timeout(),
        };

        client
            .execute(Query::new("RETURN 1".to_string()))
            .await
            .context("Neo4j is not responding to queries")?;

        info!(uri = %config.uri, label = %client.label, "Connected to Neo4j");
        Ok(client)
    }

    /// Node label used by every query.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Execute a Cypher query that returns no results.
    pub async fn execute(&self, query: Query) -> LexiResult<()> {
        match tokio::time::timeout(self.timeout, self.graph.run(query)).await {
            Ok(result) => result.map_err(|e| classify_driver_error(&e.to_string())),
            Err(_) => Err(LexiError::TraversalTimeout { depth: 1 }),
        }
    }

    /// Execute a Cypher query and return results as rows.
    ///
    /// The whole fetch, including streaming, is bounded by the query timeout.
    pub async fn query(&self, query: Query) -> LexiResult<Vec<Row>> {
        let fetch = async {
            let mut stream = self.graph.execute(query).await?;
            let mut rows = Vec::new();
            while let Some(row) = stream.next().await? {
                rows.push(row);
            }
            Ok::<_, neo4rs::Error>(rows)
        };

        match tokio::time::timeout(self.timeout, fetch).await {
            Ok(Ok(rows)) => {
                debug!(rows = rows.len(), "Neo4j query completed");
                Ok(rows)
            }
            Ok(Err(e)) => Err(classify_driver_error(&e.to_string())),
            Err(_) => Err(LexiError::TraversalTimeout { depth: 1 }),
        }
    }

    /// Execute a Cypher query and return a single scalar value.
    pub async fn query_scalar(&self, query: Query, field: &str) -> LexiResult<Option<i64>> {
        let rows = self.query(query).await?;
        match rows.into_iter().next() {
            Some(row) => row
                .get::<i64>(field)
                .map(Some)
                .map_err(|e| LexiError::Query(format!("Failed to get field '{}': {:?}", field, e))),
            None => Ok(None),
        }
    }

    /// Get node and relationship counts for status display.
    pub async fn get_counts(&self) -> LexiResult<StoreCounts> {
        let node_query = Query::new(format!("MATCH (n:{}) RETURN count(n) AS count", self.label));
        let rel_query = Query::new(format!(
            "MATCH (:{label})-[r]->(:{label}) RETURN count(r) AS count",
            label = self.label
        ));

        let nodes = self.query_scalar(node_query, "count").await?.unwrap_or(0);
        let relationships = self.query_scalar(rel_query, "count").await?.unwrap_or(0);

        Ok(StoreCounts {
            nodes: nodes.max(0) as usize,
            relationships: relationships.max(0) as usize,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_label_strips_injection() {
        let config = GraphConfig {
            label: "Word) DETACH DELETE (x".to_string(),
            ..Default::default()
        };
        assert_eq!(config.safe_label(), "WordDETACHDELETEx");

        let blank = GraphConfig {
            label: "`;".to_string(),
            ..Default::default()
        };
        assert_eq!(blank.safe_label(), "Word");
    }

    #[test]
    fn test_validate_rejects_unusable_settings() {
        assert!(GraphConfig::default().validate().is_ok());

        let zero_timeout = GraphConfig {
            query_timeout_ms: 0,
            ..Default::default()
        };
        assert!(matches!(zero_timeout.validate(), Err(LexiError::Config(_))));

        let no_uri = GraphConfig {
            uri: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(no_uri.validate(), Err(LexiError::Config(_))));
    }

    #[test]
    fn test_config_defaults_from_partial_toml_shape() {
        let config: GraphConfig =
            serde_json::from_value(serde_json::json!({ "uri": "bolt://graph:7687" })).unwrap();
        assert_eq!(config.uri, "bolt://graph:7687");
        assert_eq!(config.label, "Word");
        assert_eq!(config.query_timeout(), Duration::from_secs(8));
    }
}
