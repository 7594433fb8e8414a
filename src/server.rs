use std::sync::Arc;
use std::time::Instant;
use axum::{extract, routing::post, Router, Json};
use tower_http::cors::{CorsLayer, Any};
use serde::{Deserialize, Serialize};
use tracing::info;
use crate::codec::Codec;
use crate::hooks::StaticHooks;
use crate::state::State;

/// The codec as served: hooks come from the settings file.
pub type SharedCodec = Arc<Codec<StaticHooks>>;

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub state: State,
    /// The canonical url of the parsed state.
    pub url: String,
    pub elapsed_ms: f64,
}

#[derive(Debug, Deserialize)]
pub struct ConstructRequest {
    pub state: State,
}

#[derive(Debug, Serialize)]
pub struct ConstructResponse {
    pub url: String,
    pub elapsed_ms: f64,
}

pub fn router(codec: SharedCodec) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::POST])
        .allow_headers(Any);
    Router::new()
        .route("/v1/parse", post(parse_url))
        .route("/v1/construct", post(construct_url))
        .layer(cors)
        .with_state(codec)
}

pub async fn parse_url(
    extract::State(codec): extract::State<SharedCodec>,
    Json(request): Json<ParseRequest>,
) -> Json<ParseResponse> {
    let started = Instant::now();
    let state = codec.parse(&request.url).await;
    let url = codec.construct(&state);
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    info!(ms = elapsed_ms, request = %request.url, canonical = %url, "parse complete");
    Json(ParseResponse { state, url, elapsed_ms })
}

pub async fn construct_url(
    extract::State(codec): extract::State<SharedCodec>,
    Json(request): Json<ConstructRequest>,
) -> Json<ConstructResponse> {
    let started = Instant::now();
    let url = codec.construct(&request.state);
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    info!(ms = elapsed_ms, %url, "construct complete");
    Json(ConstructResponse { url, elapsed_ms })
}
