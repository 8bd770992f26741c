use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::sync::watch;
use shared::types::{Disposition, FilterSnapshot, InputEvent, ViewEntry};
use crate::filter::controller::FilterController;
use crate::filter::index::SearchIndex;
use crate::view::MeshView;

#[derive(Clone)]
pub struct AppState {
    pub view: Arc<MeshView>,
    pub filter: Arc<FilterController<watch::Sender<FilterSnapshot>>>,
    pub filter_rx: watch::Receiver<FilterSnapshot>,
    pub settings: Arc<ConfigResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigResponse {
    pub domain_suffix: String,
    pub debounce_ms: u64,
    pub buckets: Vec<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/config", get(get_config))
        .route("/v1/mesh", get(get_mesh))
        .route("/v1/mesh/hash", get(get_hash))
        .route("/v1/mesh/index", get(get_index))
        .route("/v1/filter", get(get_filter).post(post_filter))
        .with_state(state)
}

async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(state.settings.as_ref().clone())
}

async fn get_mesh(State(state): State<AppState>) -> Json<Vec<ViewEntry>> {
    Json(state.view.entries.clone())
}

async fn get_hash(State(state): State<AppState>) -> String {
    state.view.hash.clone()
}

async fn get_index(State(state): State<AppState>) -> Json<SearchIndex> {
    Json(state.view.index.clone())
}

async fn get_filter(State(state): State<AppState>) -> Json<FilterSnapshot> {
    Json(state.filter_rx.borrow().clone())
}

async fn post_filter(
    State(state): State<AppState>,
    Json(event): Json<InputEvent>,
) -> (StatusCode, Json<Disposition>) {
    tracing::trace!("Filter input {:?}", event);
    let disposition = state.filter.handle(event);
    (StatusCode::ACCEPTED, Json(disposition))
}
