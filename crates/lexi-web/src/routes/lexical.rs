//! Lexical graph route handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use lexi_core::{
    decorate, expand_neighbors, node_detail, ColorScheme, Depth, ExpansionRequest, GraphResponse,
    LexiResult, NodeDetailResponse, RenderGraph, SearchField,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphParams {
    pub center: Option<String>,
    /// Kept as text so malformed values get the JSON error body.
    pub depth: Option<String>,
    pub search_field: Option<String>,
    pub scheme: Option<String>,
}

impl GraphParams {
    fn request(&self) -> LexiResult<ExpansionRequest> {
        let depth = match self.depth.as_deref().map(str::trim) {
            Some(depth) if !depth.is_empty() => depth.parse::<Depth>()?,
            _ => Depth::default(),
        };
        let field = match self.search_field.as_deref() {
            Some(field) => field.parse::<SearchField>()?,
            None => SearchField::default(),
        };
        Ok(ExpansionRequest::new(
            self.center.clone().unwrap_or_default(),
            depth,
            field,
        ))
    }
}

pub async fn get_graph(
    State(state): State<AppState>,
    Query(params): Query<GraphParams>,
) -> Result<Json<GraphResponse>, ApiError> {
    let request = params.request()?;
    let graph = expand_neighbors(state.store.as_ref(), &request, &state.config).await?;
    Ok(Json(graph))
}

pub async fn get_render(
    State(state): State<AppState>,
    Query(params): Query<GraphParams>,
) -> Result<Json<RenderGraph>, ApiError> {
    let request = params.request()?;
    let scheme = match params.scheme.as_deref() {
        Some(scheme) => scheme.parse::<ColorScheme>()?,
        None => ColorScheme::default(),
    };
    let graph = expand_neighbors(state.store.as_ref(), &request, &state.config).await?;
    Ok(Json(decorate(&graph, scheme)))
}

pub async fn get_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NodeDetailResponse>, ApiError> {
    let detail = node_detail(state.store.as_ref(), &id, &state.config).await?;
    Ok(Json(detail))
}
