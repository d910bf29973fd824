//! Lexigraph Web Server
//!
//! Axum-based REST API for the lexical graph plus the bundled 2D/3D viewer.

pub mod error;
pub mod routes;
pub mod state;

use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/lexical/graph", get(routes::lexical::get_graph))
        .route("/lexical/render", get(routes::lexical::get_render))
        .route("/lexical/node/{id}", get(routes::lexical::get_node))
        .route("/health", get(routes::health::health));

    Router::new()
        .route("/", get(routes::viewer::index))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server until Ctrl+C.
pub async fn run_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down web server");
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use lexi_core::raw::{RawGraph, RawNeighbor, RawNode};
    use lexi_core::{
        LexiError, LexiResult, LexicalStore, MemoryStore, SearchField, ServiceConfig, StoreCounts,
    };
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    const FIXTURE: &str = r#"{
        "nodes": [
            { "id": "猫", "kanji": "猫", "hiragana": "ねこ", "translation": "cat", "level": "N5" },
            { "id": "犬", "kanji": "犬", "hiragana": "いぬ", "translation": "dog", "level": "N5" },
            { "id": "動物", "kanji": "動物", "hiragana": "どうぶつ", "translation": "animal", "level": "N4" }
        ],
        "edges": [
            { "source": "猫", "target": "動物", "relationType": "hypernym", "weight": 3 },
            { "source": "犬", "target": "動物", "relationType": "hypernym", "weight": 1 },
            { "source": "猫", "target": "犬", "relationType": "related", "weight": 5 }
        ]
    }"#;

    enum Failure {
        Timeout,
        Down,
    }

    struct BrokenStore(Failure);

    impl BrokenStore {
        fn fail<T>(&self) -> LexiResult<T> {
            match self.0 {
                Failure::Timeout => Err(LexiError::TraversalTimeout { depth: 1 }),
                Failure::Down => Err(LexiError::unavailable("connection refused")),
            }
        }
    }

    #[async_trait]
    impl LexicalStore for BrokenStore {
        async fn resolve_center(&self, term: &str, _field: SearchField) -> LexiResult<Option<RawNode>> {
            match self.0 {
                Failure::Timeout => Ok(Some(RawNode {
                    id: Some(term.to_string()),
                    ..Default::default()
                })),
                Failure::Down => self.fail(),
            }
        }

        async fn expand_frontier(&self, _frontier: &[String], _limit: usize) -> LexiResult<RawGraph> {
            self.fail()
        }

        async fn fetch_node(&self, _id: &str) -> LexiResult<Option<RawNode>> {
            self.fail()
        }

        async fn fetch_neighbors(&self, _id: &str, _limit: usize) -> LexiResult<Vec<RawNeighbor>> {
            self.fail()
        }

        async fn counts(&self) -> LexiResult<StoreCounts> {
            self.fail()
        }
    }

    fn app() -> Router {
        let store = Arc::new(MemoryStore::from_json(FIXTURE).unwrap());
        create_router(AppState::new(store, ServiceConfig::default()))
    }

    fn broken_app(failure: Failure) -> Router {
        create_router(AppState::new(Arc::new(BrokenStore(failure)), ServiceConfig::default()))
    }

    /// Percent-encode everything but ASCII alphanumerics.
    fn encode(s: &str) -> String {
        s.bytes()
            .map(|b| {
                if b.is_ascii_alphanumeric() {
                    (b as char).to_string()
                } else {
                    format!("%{:02X}", b)
                }
            })
            .collect()
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, body)
    }

    #[tokio::test]
    async fn test_graph_endpoint_expands_center() {
        let uri = format!("/api/v1/lexical/graph?center={}&depth=1&searchField=kanji", encode("猫"));
        let (status, _, body) = get(app(), &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["center"]["id"], "猫");
        assert_eq!(body["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(body["links"][0]["weight"], 5.0);
        assert_eq!(body["nodes"][0]["isCenter"], true);
    }

    #[tokio::test]
    async fn test_graph_endpoint_empty_and_no_match() {
        let (status, _, body) = get(app(), "/api/v1/lexical/graph?center=%20").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("center").is_none());
        assert_eq!(body["nodes"], serde_json::json!([]));

        let uri = format!("/api/v1/lexical/graph?center={}", encode("存在しない"));
        let (status, _, body) = get(app(), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["center"]["id"], Value::Null);
        assert_eq!(body["links"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_graph_endpoint_translation_search() {
        let (status, _, body) = get(app(), "/api/v1/lexical/graph?center=Animal&searchField=translation").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["center"]["id"], "動物");
    }

    #[tokio::test]
    async fn test_invalid_depth_is_bad_request() {
        let uri = format!("/api/v1/lexical/graph?center={}&depth=3", encode("猫"));
        let (status, _, body) = get(app(), &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_depth");

        let uri = format!("/api/v1/lexical/graph?center={}&depth=abc", encode("猫"));
        let (status, headers, body) = get(app(), &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(headers.get("content-type").unwrap(), "application/json");
        assert_eq!(body["code"], "invalid_depth");
        assert!(body["error"].as_str().unwrap().contains("abc"));

        let uri = format!("/api/v1/lexical/graph?center={}&searchField=romaji", encode("猫"));
        let (status, _, body) = get(app(), &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_search_field");
    }

    #[tokio::test]
    async fn test_render_endpoint_colors_nodes() {
        let uri = format!("/api/v1/lexical/render?center={}&scheme=level", encode("猫"));
        let (status, _, body) = get(app(), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["scheme"], "level");
        assert_eq!(body["center"], "猫");
        assert_eq!(body["nodes"][0]["color"], lexi_core::present::CENTER_COLOR);
        assert_eq!(body["nodes"][0]["label"], "猫 (ねこ)");
    }

    #[tokio::test]
    async fn test_node_endpoint_orders_neighbors() {
        let uri = format!("/api/v1/lexical/node/{}", encode("猫"));
        let (status, _, body) = get(app(), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["node"]["translation"], "cat");
        let targets: Vec<&str> = body["neighbors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["target"].as_str().unwrap())
            .collect();
        assert_eq!(targets, vec!["犬", "動物"]);
    }

    #[tokio::test]
    async fn test_unknown_node_is_not_found() {
        let uri = format!("/api/v1/lexical/node/{}", encode("鳥"));
        let (status, _, body) = get(app(), &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "node_not_found");
    }

    #[tokio::test]
    async fn test_timeout_maps_to_gateway_timeout_with_hint() {
        let uri = format!("/api/v1/lexical/graph?center={}&depth=2", encode("猫"));
        let (status, _, body) = get(broken_app(Failure::Timeout), &uri).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["code"], "traversal_timeout");
        assert_eq!(body["error"], "Traversal timed out at depth 2");
        assert!(body["hint"].as_str().unwrap().contains("reduce depth"));
        assert_eq!(body["retryable"], true);
    }

    #[tokio::test]
    async fn test_store_outage_is_retryable_unavailable() {
        let uri = format!("/api/v1/lexical/graph?center={}", encode("猫"));
        let (status, headers, body) = get(broken_app(Failure::Down), &uri).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "store_unavailable");
        assert_eq!(headers.get("retry-after").unwrap(), "5");
    }

    #[tokio::test]
    async fn test_node_detail_timeout_is_unavailable() {
        let uri = format!("/api/v1/lexical/node/{}", encode("猫"));
        let (status, headers, body) = get(broken_app(Failure::Timeout), &uri).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "store_unavailable");
        assert_eq!(headers.get("retry-after").unwrap(), "5");
    }

    #[tokio::test]
    async fn test_health_reports_counts_and_outage() {
        let (status, _, body) = get(app(), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nodes"], 3);
        assert_eq!(body["relationships"], 3);

        let (status, _, body) = get(broken_app(Failure::Down), "/api/v1/health").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unavailable");
    }

    #[tokio::test]
    async fn test_viewer_page_served() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("force-graph"));
        assert!(html.contains("/api/v1/lexical/render"));
    }

    #[tokio::test]
    async fn test_viewer_detail_panel_writes_text_only() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        let panel = &html[html.find("async function showDetail").unwrap()..];
        let panel = &panel[..panel.find("$('go')").unwrap()];
        assert!(!panel.contains("innerHTML"));
        assert!(panel.contains("replaceChildren"));
        assert!(html.contains("e.textContent = text"));
    }
}
