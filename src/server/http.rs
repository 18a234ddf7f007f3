//! HTTP surface of the relay.
//!
//! Three routes, no sessions, no shared mutable state: every request is
//! independent and the only await point is the single upstream call.

use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::error::RelayError;
use crate::photos::{select_image, PhotoSet};
use crate::vision::VisionService;

pub struct Server {
    config: Config,
}

struct AppState {
    vision: VisionService,
}

impl Server {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
        })
    }

    pub async fn run(&self) -> Result<()> {
        let vision = VisionService::new(&self.config.upstream, &self.config.analysis)?;
        let app = router(vision, self.config.server.body_limit_bytes);

        let addr: SocketAddr =
            format!("{}:{}", self.config.server.bind, self.config.server.port).parse()?;

        info!("Starting HTTP server on http://{}", addr);
        info!("Available endpoints: GET /, GET /ping, POST /analyze-skin");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

fn router(vision: VisionService, body_limit_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/ping", get(ping))
        .route("/analyze-skin", post(analyze_skin))
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(AppState { vision }))
}

async fn root() -> &'static str {
    "SkinEvo relay is running! Try /ping endpoint."
}

async fn ping() -> &'static str {
    info!("Received ping request");
    "pong"
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    photos: Option<PhotoSet>,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    result: String,
}

async fn analyze_skin(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, RelayError> {
    info!("Received request to /analyze-skin");

    let photos = request.photos.ok_or(RelayError::MissingPhotos)?;
    let image = select_image(&photos)?;

    info!(label = %image.label, mime = %image.mime_type, "Calling vision API for skin analysis");

    let result = state.vision.analyze(&image).await?;

    info!(chars = result.len(), "Returning analysis to caller");

    Ok(Json(AnalyzeResponse { result }))
}
