//! Neo4j schema initialization (constraints and indexes).

use lexi_core::LexiResult;
use neo4rs::Query;
use tracing::info;

use crate::GraphClient;

/// Cypher statements for the lexical schema of nodes labelled `label`.
pub fn schema_statements(label: &str) -> Vec<String> {
    let prefix = label.to_lowercase();
    vec![
        format!("CREATE CONSTRAINT {p}_id IF NOT EXISTS FOR (w:{l}) REQUIRE w.id IS UNIQUE", p = prefix, l = label),
        format!("CREATE INDEX {p}_kanji IF NOT EXISTS FOR (w:{l}) ON (w.kanji)", p = prefix, l = label),
        format!("CREATE INDEX {p}_hiragana IF NOT EXISTS FOR (w:{l}) ON (w.hiragana)", p = prefix, l = label),
        format!("CREATE INDEX {p}_translation IF NOT EXISTS FOR (w:{l}) ON (w.translation)", p = prefix, l = label),
    ]
}

/// Initialize Neo4j schema with constraints and indexes.
///
/// Safe to run multiple times - uses IF NOT EXISTS clauses.
pub async fn initialize_schema(client: &GraphClient) -> LexiResult<usize> {
    info!("Initializing Neo4j schema...");

    let statements = schema_statements(client.label());
    for statement in &statements {
        client.execute(Query::new(statement.clone())).await?;
    }

    info!("Neo4j schema initialized ({} statements)", statements.len());
    Ok(statements.len())
}
